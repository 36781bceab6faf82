//! Checkout
//!
//! Supermarket checkout pricing: a catalog of items with optional bulk discounts
//! ("3 for 130"), a log of purchases, and totals with the discounts applied.

pub mod discounts;
pub mod fixtures;
pub mod items;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod supermarket;
