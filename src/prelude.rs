//! Checkout prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    discounts::{AppliedDiscount, BulkDiscount},
    fixtures::{Fixture, FixtureError, ItemKey},
    items::{Item, ItemError},
    pricing::{LinePrice, PricingError, price_quantity},
    receipt::{Receipt, ReceiptError, ReceiptLine},
    supermarket::{
        Supermarket, SupermarketError,
        lines::{PurchaseLine, group_purchases},
    },
};
