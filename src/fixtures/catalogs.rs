//! Catalog Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{fixtures::FixtureError, items::Item};

/// Wrapper for catalogs in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Catalog entries, in catalog order
    pub items: Vec<ItemFixture>,
}

/// Item Fixture
#[derive(Debug, Deserialize)]
pub struct ItemFixture {
    /// Key used by purchase fixtures to refer to this item
    pub key: String,

    /// Item name
    pub name: String,

    /// Unit price (e.g., "0.50 GBP")
    pub price: String,

    /// Optional bulk discount
    #[serde(default)]
    pub discount: Option<DiscountFixture>,
}

/// Bulk discount fixture
#[derive(Debug, Deserialize)]
pub struct DiscountFixture {
    /// Units that must be bought together
    pub threshold: usize,

    /// Price for a complete group (e.g., "1.30 GBP")
    pub price: String,
}

impl TryFrom<ItemFixture> for Item<'_> {
    type Error = FixtureError;

    fn try_from(fixture: ItemFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;
        let price = Money::from_minor(minor_units, currency);

        let item = match fixture.discount {
            Some(discount) => {
                let (discount_minor, discount_currency) = parse_price(&discount.price)?;

                Item::with_discount(
                    fixture.name,
                    price,
                    discount.threshold,
                    Money::from_minor(discount_minor, discount_currency),
                )?
            }
            None => Item::new(fixture.name, price)?,
        };

        Ok(item)
    }
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}
