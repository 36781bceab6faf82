//! Discounts

use std::num::NonZeroUsize;

use rusty_money::{Money, iso::Currency};

use crate::pricing::{PricingError, multiply};

/// Bulk discount: every complete group of `threshold` units costs `price`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulkDiscount<'a> {
    threshold: NonZeroUsize,
    price: Money<'a, Currency>,
}

/// Outcome of applying a [`BulkDiscount`] to a quantity of units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedDiscount<'a> {
    /// Number of complete groups charged at the discount price
    pub groups: usize,

    /// Units left over and charged at the unit price
    pub remainder: usize,

    /// Amount charged for all units
    pub total: Money<'a, Currency>,
}

impl<'a> BulkDiscount<'a> {
    /// Creates a new bulk discount.
    pub fn new(threshold: NonZeroUsize, price: Money<'a, Currency>) -> Self {
        Self { threshold, price }
    }

    /// Number of units that must be bought together
    pub fn threshold(&self) -> NonZeroUsize {
        self.threshold
    }

    /// Price charged for one complete group
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Prices `quantity` units of an item with the given unit price.
    ///
    /// The discount price replaces the group price even when it is higher than
    /// buying the units individually.
    ///
    /// # Errors
    ///
    /// - [`PricingError::Overflow`]: the amount does not fit in minor units.
    /// - [`PricingError::Money`]: the unit price is in a different currency.
    pub fn apply(
        &self,
        unit_price: &Money<'a, Currency>,
        quantity: usize,
    ) -> Result<AppliedDiscount<'a>, PricingError> {
        let threshold = self.threshold.get();
        let groups = quantity / threshold;
        let remainder = quantity % threshold;

        let total = multiply(&self.price, groups)?.add(multiply(unit_price, remainder)?)?;

        Ok(AppliedDiscount {
            groups,
            remainder,
            total,
        })
    }
}
