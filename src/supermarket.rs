//! Supermarket

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    items::Item,
    pricing::{PricingError, sum_prices},
    receipt::{Receipt, ReceiptError},
    supermarket::lines::{PurchaseLine, group_purchases},
};

pub mod lines;

/// Errors related to supermarket construction or purchases.
#[derive(Debug, Error, PartialEq)]
pub enum SupermarketError {
    /// A catalog item's currency differs from the supermarket currency
    /// (index, item currency, supermarket currency).
    #[error("Catalog item {0} has currency {1}, but supermarket has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// A purchased item's currency differs from the supermarket currency
    /// (item name, item currency, supermarket currency).
    #[error("Item {0} has currency {1}, but supermarket has currency {2}")]
    PurchaseCurrencyMismatch(String, &'static str, &'static str),
}

/// A supermarket: a catalog of items and a log of the items bought.
#[derive(Debug, Clone)]
pub struct Supermarket<'a> {
    items: Vec<Item<'a>>,
    bought: Vec<Item<'a>>,
    currency: &'static Currency,
}

impl<'a> Supermarket<'a> {
    /// Create a new supermarket with the given catalog and no purchases.
    ///
    /// # Errors
    ///
    /// Returns a `SupermarketError` if a catalog item is priced in another currency.
    pub fn new(
        items: impl Into<Vec<Item<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, SupermarketError> {
        let items = items.into();

        items.iter().enumerate().try_for_each(|(i, item)| {
            let item_currency = item.price().currency();
            if item_currency == currency {
                Ok(())
            } else {
                Err(SupermarketError::CurrencyMismatch(
                    i,
                    item_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ))
            }
        })?;

        Ok(Supermarket {
            items,
            bought: Vec::new(),
            currency,
        })
    }

    /// The catalog, in the order it was supplied.
    pub fn items(&self) -> &[Item<'a>] {
        &self.items
    }

    /// Record the purchase of one unit of `item`.
    ///
    /// The item does not have to be in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `SupermarketError::PurchaseCurrencyMismatch` if the item is priced in another
    /// currency. Nothing is recorded in that case.
    pub fn buy(&mut self, item: &Item<'a>) -> Result<(), SupermarketError> {
        let item_currency = item.price().currency();

        if item_currency != self.currency {
            return Err(SupermarketError::PurchaseCurrencyMismatch(
                item.name().to_string(),
                item_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        debug!(item = item.name(), price = %item.price(), "item bought");

        self.bought.push(item.clone());

        Ok(())
    }

    /// Items bought so far, in purchase order.
    pub fn bought_items(&self) -> &[Item<'a>] {
        &self.bought
    }

    /// Purchases grouped by item definition, in order of first purchase.
    pub fn lines(&self) -> Vec<PurchaseLine<'_, 'a>> {
        group_purchases(&self.bought)
    }

    /// Sum of unit prices over all purchases, ignoring discounts.
    ///
    /// # Errors
    ///
    /// Returns a `PricingError` if there was a money arithmetic error.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, PricingError> {
        sum_prices(self.bought.iter().map(|item| *item.price()), self.currency)
    }

    /// Total amount due, with bulk discounts applied per item definition.
    ///
    /// # Errors
    ///
    /// Returns a `PricingError` if an amount overflows or there was a money arithmetic error.
    #[tracing::instrument(
        name = "supermarket.total",
        skip(self),
        fields(purchases = self.bought.len()),
        err
    )]
    pub fn total(&self) -> Result<Money<'a, Currency>, PricingError> {
        let prices = self
            .lines()
            .iter()
            .map(PurchaseLine::price)
            .collect::<Result<Vec<_>, _>>()?;

        let total = sum_prices(prices.iter().map(|price| price.total), self.currency)?;

        debug!(%total, lines = prices.len(), "computed total");

        Ok(total)
    }

    /// Amount saved by bulk discounts.
    ///
    /// # Errors
    ///
    /// Returns a `PricingError` if an amount overflows or there was a money arithmetic error.
    pub fn savings(&self) -> Result<Money<'a, Currency>, PricingError> {
        Ok(self.subtotal()?.sub(self.total()?)?)
    }

    /// Build an itemised receipt for the purchases so far.
    ///
    /// # Errors
    ///
    /// Returns a `ReceiptError` if the purchases cannot be priced.
    pub fn receipt(&self) -> Result<Receipt<'a>, ReceiptError> {
        Receipt::from_supermarket(self)
    }

    /// Get the number of items bought.
    pub fn len(&self) -> usize {
        self.bought.len()
    }

    /// Check if nothing has been bought.
    pub fn is_empty(&self) -> bool {
        self.bought.is_empty()
    }

    /// Get the currency of the supermarket.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
