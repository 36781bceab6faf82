//! Pricing

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::items::Item;

/// Errors that can occur while pricing purchases.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The amount does not fit in minor units (quantity being priced).
    #[error("price of {0} units overflows")]
    Overflow(usize),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Price of a quantity of one item definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrice<'a> {
    /// Quantity multiplied by the unit price, before any discount
    pub base: Money<'a, Currency>,

    /// Amount charged after the item's discount rule, if any
    pub total: Money<'a, Currency>,

    /// Number of complete discount groups charged at the discount price
    pub discount_groups: usize,
}

impl<'a> LinePrice<'a> {
    /// Amount saved by the discount rule.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.base.sub(self.total)
    }
}

/// Prices `quantity` units of `item`, applying its bulk discount if it has one.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: the amount does not fit in minor units.
/// - [`PricingError::Money`]: wrapped money arithmetic error.
pub fn price_quantity<'a>(
    item: &Item<'a>,
    quantity: usize,
) -> Result<LinePrice<'a>, PricingError> {
    let base = multiply(item.price(), quantity)?;

    let Some(discount) = item.discount() else {
        return Ok(LinePrice {
            base,
            total: base,
            discount_groups: 0,
        });
    };

    let applied = discount.apply(item.price(), quantity)?;

    Ok(LinePrice {
        base,
        total: applied.total,
        discount_groups: applied.groups,
    })
}

/// Sums a list of prices, starting from zero in `currency`.
///
/// # Errors
///
/// Returns [`PricingError::Money`] if a price is in a different currency.
pub fn sum_prices<'a>(
    prices: impl IntoIterator<Item = Money<'a, Currency>>,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PricingError> {
    let total = prices
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, price| acc.add(price))?;

    Ok(total)
}

/// Multiplies a price by a quantity in minor units.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result does not fit in an `i64`.
pub fn multiply<'a>(
    price: &Money<'a, Currency>,
    quantity: usize,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = i64::try_from(quantity)
        .ok()
        .and_then(|quantity| price.to_minor_units().checked_mul(quantity))
        .ok_or(PricingError::Overflow(quantity))?;

    Ok(Money::from_minor(minor, price.currency()))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn price_quantity_without_discount() -> TestResult {
        let item = Item::new("C", Money::from_minor(20, GBP))?;

        let price = price_quantity(&item, 4)?;

        assert_eq!(price.base, Money::from_minor(80, GBP));
        assert_eq!(price.total, Money::from_minor(80, GBP));
        assert_eq!(price.discount_groups, 0);
        assert_eq!(price.savings()?, Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn price_quantity_with_discount() -> TestResult {
        let item = Item::with_discount(
            "B",
            Money::from_minor(30, GBP),
            2,
            Money::from_minor(45, GBP),
        )?;

        let price = price_quantity(&item, 5)?;

        assert_eq!(price.base, Money::from_minor(150, GBP));
        assert_eq!(price.total, Money::from_minor(120, GBP));
        assert_eq!(price.discount_groups, 2);
        assert_eq!(price.savings()?, Money::from_minor(30, GBP));

        Ok(())
    }

    #[test]
    fn sum_prices_empty_is_zero() -> TestResult {
        let prices: [Money<'_, Currency>; 0] = [];

        assert_eq!(sum_prices(prices, GBP)?, Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn sum_prices_adds_prices() -> TestResult {
        let prices = [Money::from_minor(50, GBP), Money::from_minor(30, GBP)];

        assert_eq!(sum_prices(prices, GBP)?, Money::from_minor(80, GBP));

        Ok(())
    }

    #[test]
    fn sum_prices_rejects_mixed_currencies() {
        let prices = [Money::from_minor(50, GBP), Money::from_minor(30, USD)];

        assert!(matches!(
            sum_prices(prices, GBP),
            Err(PricingError::Money(_))
        ));
    }

    #[test]
    fn multiply_overflow_errors() {
        let price = Money::from_minor(100, GBP);

        assert_eq!(
            multiply(&price, usize::MAX),
            Err(PricingError::Overflow(usize::MAX))
        );
    }
}
