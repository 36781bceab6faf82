//! Items

use std::{
    hash::{Hash, Hasher},
    num::NonZeroUsize,
};

use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::discounts::BulkDiscount;

/// Errors raised when an item definition is invalid.
#[derive(Debug, Error, PartialEq)]
pub enum ItemError {
    /// The item name was empty or only whitespace.
    #[error("item name must not be empty")]
    EmptyName,

    /// The unit price was below zero (item name, price in minor units).
    #[error("item {0} has negative price {1}")]
    NegativePrice(String, i64),

    /// The bulk discount price was below zero (item name, price in minor units).
    #[error("item {0} has negative discount price {1}")]
    NegativeDiscountPrice(String, i64),

    /// A price is not a whole number of minor units (item name, amount).
    #[error("item {0} has price {1} with fractions of a minor unit")]
    FractionalPrice(String, Decimal),

    /// A price does not fit in `i64` minor units (item name, amount).
    #[error("item {0} has price {1} outside the supported range")]
    PriceOutOfRange(String, Decimal),

    /// The discount price currency differs from the unit price currency
    /// (item name, discount currency, unit price currency).
    #[error("item {0} has discount price in {1}, but unit price in {2}")]
    CurrencyMismatch(String, &'static str, &'static str),
}

/// An item definition: a named product with a unit price and an optional
/// bulk discount.
///
/// Two items are equal when their name, price and discount rule all match.
/// Items sharing a name but priced differently are distinct definitions.
#[derive(Clone, Debug)]
pub struct Item<'a> {
    name: String,
    price: Money<'a, Currency>,
    discount: Option<BulkDiscount<'a>>,
}

impl<'a> Item<'a> {
    /// Creates a new item with no discount rule.
    ///
    /// # Errors
    ///
    /// - [`ItemError::EmptyName`]: the name is empty.
    /// - [`ItemError::FractionalPrice`]: the price has fractions of a minor unit.
    /// - [`ItemError::PriceOutOfRange`]: the price does not fit in minor units.
    /// - [`ItemError::NegativePrice`]: the price is below zero.
    pub fn new(name: impl Into<String>, price: Money<'a, Currency>) -> Result<Self, ItemError> {
        let name = name.into();

        validate(&name, &price)?;

        Ok(Self {
            name,
            price,
            discount: None,
        })
    }

    /// Creates a new item that costs `discount_price` for every `threshold` units bought together.
    ///
    /// A `threshold` of zero means the item has no discount rule, and `discount_price` is ignored.
    ///
    /// # Errors
    ///
    /// - [`ItemError::EmptyName`]: the name is empty.
    /// - [`ItemError::FractionalPrice`]: either price has fractions of a minor unit.
    /// - [`ItemError::PriceOutOfRange`]: either price does not fit in minor units.
    /// - [`ItemError::NegativePrice`]: the unit price is below zero.
    /// - [`ItemError::NegativeDiscountPrice`]: the discount price is below zero.
    /// - [`ItemError::CurrencyMismatch`]: the two prices are in different currencies.
    pub fn with_discount(
        name: impl Into<String>,
        price: Money<'a, Currency>,
        threshold: usize,
        discount_price: Money<'a, Currency>,
    ) -> Result<Self, ItemError> {
        let Some(threshold) = NonZeroUsize::new(threshold) else {
            return Self::new(name, price);
        };

        let name = name.into();

        validate(&name, &price)?;
        let discount_minor = exact_minor_units(&name, &discount_price)?;

        if discount_minor < 0 {
            return Err(ItemError::NegativeDiscountPrice(name, discount_minor));
        }

        if discount_price.currency() != price.currency() {
            return Err(ItemError::CurrencyMismatch(
                name,
                discount_price.currency().iso_alpha_code,
                price.currency().iso_alpha_code,
            ));
        }

        Ok(Self {
            name,
            price,
            discount: Some(BulkDiscount::new(threshold, discount_price)),
        })
    }

    /// Returns the name of the item
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unit price of the item
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Returns the bulk discount rule, if the item has one.
    pub fn discount(&self) -> Option<&BulkDiscount<'a>> {
        self.discount.as_ref()
    }

    /// Returns the number of units needed for the discount, or zero if there is no rule.
    pub fn discount_threshold(&self) -> usize {
        self.discount
            .as_ref()
            .map_or(0, |discount| discount.threshold().get())
    }

    /// Value used for equality and hashing.
    fn identity(&self) -> (&str, i64, &'static str, usize, i64) {
        (
            &self.name,
            self.price.to_minor_units(),
            self.price.currency().iso_alpha_code,
            self.discount_threshold(),
            self.discount
                .as_ref()
                .map_or(0, |discount| discount.price().to_minor_units()),
        )
    }
}

impl PartialEq for Item<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Item<'_> {}

impl Hash for Item<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

fn validate(name: &str, price: &Money<'_, Currency>) -> Result<(), ItemError> {
    if name.trim().is_empty() {
        return Err(ItemError::EmptyName);
    }

    let minor = exact_minor_units(name, price)?;

    if minor < 0 {
        return Err(ItemError::NegativePrice(name.to_string(), minor));
    }

    Ok(())
}

/// Converts a price to minor units, rejecting amounts that would be rounded or truncated.
fn exact_minor_units(name: &str, price: &Money<'_, Currency>) -> Result<i64, ItemError> {
    price.try_to_minor_units().map_err(|err| match err {
        MoneyError::PrecisionLoss => ItemError::FractionalPrice(name.to_string(), *price.amount()),
        _ => ItemError::PriceOutOfRange(name.to_string(), *price.amount()),
    })
}
