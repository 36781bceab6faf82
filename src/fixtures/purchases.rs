//! Purchase Fixtures

use serde::Deserialize;

/// Wrapper for purchases in YAML
#[derive(Debug, Deserialize)]
pub struct PurchasesFixture {
    /// Catalog item keys, one per unit bought, in purchase order
    pub purchases: Vec<String>,
}
