//! Receipt

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;
use tracing::debug;

use crate::{
    pricing::{PricingError, sum_prices},
    supermarket::Supermarket,
};

/// Errors that can occur when building or printing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error pricing the purchase lines.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// A receipt line: every unit bought of one item definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine<'a> {
    name: String,
    quantity: usize,
    unit_price: Money<'a, Currency>,
    base_price: Money<'a, Currency>,
    final_price: Money<'a, Currency>,
    discount_groups: usize,
}

impl<'a> ReceiptLine<'a> {
    /// Item name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Units bought
    pub fn quantity(&self) -> usize {
        self.quantity
    }

    /// Price of a single unit
    pub fn unit_price(&self) -> Money<'a, Currency> {
        self.unit_price
    }

    /// Price of all units before discounts
    pub fn base_price(&self) -> Money<'a, Currency> {
        self.base_price
    }

    /// Price of all units after discounts
    pub fn final_price(&self) -> Money<'a, Currency> {
        self.final_price
    }

    /// Number of complete bulk discount groups
    pub fn discount_groups(&self) -> usize {
        self.discount_groups
    }

    /// Amount saved on this line.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.base_price.sub(self.final_price)
    }
}

/// Itemised receipt for a supermarket's purchases.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    /// One line per item definition, in order of first purchase
    lines: SmallVec<[ReceiptLine<'a>; 10]>,

    /// Total cost before any discounts
    subtotal: Money<'a, Currency>,

    /// Total amount paid after discounts
    total: Money<'a, Currency>,

    /// Currency used for all monetary values
    currency: &'static Currency,
}

impl<'a> Receipt<'a> {
    /// Build a receipt from the purchases recorded by a supermarket.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the purchases cannot be priced.
    #[tracing::instrument(
        name = "receipt.from_supermarket",
        skip(supermarket),
        fields(purchases = supermarket.len()),
        err
    )]
    pub fn from_supermarket(supermarket: &Supermarket<'a>) -> Result<Self, ReceiptError> {
        let currency = supermarket.currency();

        let lines = supermarket
            .lines()
            .iter()
            .map(|line| -> Result<ReceiptLine<'a>, PricingError> {
                let price = line.price()?;
                let item = line.item();

                Ok(ReceiptLine {
                    name: item.name().to_string(),
                    quantity: line.quantity(),
                    unit_price: *item.price(),
                    base_price: price.base,
                    final_price: price.total,
                    discount_groups: price.discount_groups,
                })
            })
            .collect::<Result<SmallVec<[ReceiptLine<'a>; 10]>, _>>()?;

        let subtotal = sum_prices(lines.iter().map(ReceiptLine::base_price), currency)?;
        let total = sum_prices(lines.iter().map(ReceiptLine::final_price), currency)?;

        debug!(lines = lines.len(), %subtotal, %total, "built receipt");

        Ok(Receipt {
            lines,
            subtotal,
            total,
            currency,
        })
    }

    /// Receipt lines, in order of first purchase
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Total cost before any discounts
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Total amount paid for all items
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Currency used for all monetary values.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Calculate the savings made by applying discounts.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }

    /// Calculates the savings as a fraction of the subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings = *self.savings()?.amount();
        let subtotal = *self.subtotal.amount();

        if subtotal.is_zero() {
            return Ok(Percentage::from(0.0));
        }

        Ok(Percentage::from(savings / subtotal))
    }

    /// Writes the receipt as a table followed by a summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record([
            "",
            "Item",
            "Qty",
            "Unit Price",
            "Base Price",
            "Discounted Price",
            "Savings",
        ]);

        for (idx, line) in self.lines.iter().enumerate() {
            let (final_price, savings) = if line.discount_groups == 0 {
                (String::new(), String::new())
            } else {
                (format!("{}", line.final_price), format!("-{}", line.savings()?))
            };

            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.name.clone(),
                line.quantity.to_string(),
                format!("{}", line.unit_price),
                format!("{}", line.base_price),
                final_price,
                savings,
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..7), Alignment::right());

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        let percent_points = percent_points_from_fractional_percentage(self.savings_percent()?);

        writeln!(out, " Subtotal: {}", self.subtotal).map_err(|_err| ReceiptError::IO)?;
        writeln!(out, " Total:    {}", self.total).map_err(|_err| ReceiptError::IO)?;
        writeln!(out, " Savings:  ({percent_points:.2}%) {}", self.savings()?)
            .map_err(|_err| ReceiptError::IO)?;

        Ok(())
    }
}

/// Converts a fractional percentage to percent points for display.
fn percent_points_from_fractional_percentage(percentage: Percentage) -> Decimal {
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
}
