//! Fixtures

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;
use tracing::debug;

use crate::{
    fixtures::{catalogs::CatalogFixture, purchases::PurchasesFixture},
    items::{Item, ItemError},
    supermarket::{Supermarket, SupermarketError},
};

pub mod catalogs;
pub mod purchases;

new_key_type! {
    /// Fixture Item Key
    pub struct ItemKey;
}

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Invalid item definition
    #[error("Invalid item: {0}")]
    InvalidItem(#[from] ItemError),

    /// Item key not found in the loaded catalog
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Item key defined more than once
    #[error("Duplicate item key: {0}")]
    DuplicateItem(String),

    /// Currency mismatch between items
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No catalog loaded yet
    #[error("No catalog loaded yet; currency unknown")]
    NoCurrency,

    /// Supermarket creation error
    #[error("Failed to create supermarket: {0}")]
    Supermarket(#[from] SupermarketError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// `SlotMap` storing the item definitions with generated keys
    item_meta: SlotMap<ItemKey, Item<'a>>,

    /// String key -> `SlotMap` key mappings for lookups
    item_keys: FxHashMap<String, ItemKey>,

    /// Catalog order
    catalog: Vec<ItemKey>,

    /// Items bought, in purchase order
    purchases: Vec<ItemKey>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            item_meta: SlotMap::with_key(),
            item_keys: FxHashMap::default(),
            catalog: Vec::new(),
            purchases: Vec::new(),
            currency: None,
        }
    }

    /// Load a catalog from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if an item is invalid,
    /// if an item key is repeated, or if there are currency mismatches.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalogs").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CatalogFixture = serde_norway::from_str(&contents)?;

        let count = fixture.items.len();

        for item_fixture in fixture.items {
            if self.item_keys.contains_key(&item_fixture.key) {
                return Err(FixtureError::DuplicateItem(item_fixture.key));
            }

            // Parse to get the currency first (before creating the item)
            let (_minor_units, currency) = catalogs::parse_price(&item_fixture.price)?;

            self.check_currency(currency)?;

            let key = item_fixture.key.clone();
            let item: Item<'a> = item_fixture.try_into()?;

            let item_key = self.item_meta.insert(item);

            self.item_keys.insert(key, item_key);
            self.catalog.push(item_key);
        }

        debug!(path = %file_path.display(), items = count, "loaded catalog fixture");

        Ok(self)
    }

    /// Load purchases from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if referenced items don't exist.
    pub fn load_purchases(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("purchases").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: PurchasesFixture = serde_norway::from_str(&contents)?;

        for key in &fixture.purchases {
            let item_key = self.item_key(key)?;

            self.purchases.push(item_key);
        }

        debug!(
            path = %file_path.display(),
            purchases = fixture.purchases.len(),
            "loaded purchases fixture"
        );

        Ok(self)
    }

    /// Load a complete fixture set (catalog and purchases with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_catalog(name)?.load_purchases(name)?;

        Ok(fixture)
    }

    /// Get an item by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the item is not found.
    pub fn item(&self, key: &str) -> Result<&Item<'a>, FixtureError> {
        let item_key = self.item_key(key)?;

        self.item_meta
            .get(item_key)
            .ok_or_else(|| FixtureError::ItemNotFound(key.to_string()))
    }

    /// Get an item key by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the item is not found.
    pub fn item_key(&self, key: &str) -> Result<ItemKey, FixtureError> {
        self.item_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::ItemNotFound(key.to_string()))
    }

    /// Catalog items, in catalog order
    pub fn items(&self) -> impl Iterator<Item = &Item<'a>> {
        self.catalog
            .iter()
            .filter_map(|item_key| self.item_meta.get(*item_key))
    }

    /// Purchased items, in purchase order
    pub fn purchases(&self) -> impl Iterator<Item = &Item<'a>> {
        self.purchases
            .iter()
            .filter_map(|item_key| self.item_meta.get(*item_key))
    }

    /// Create a supermarket with the loaded catalog and every loaded purchase bought
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog is loaded or if the supermarket cannot be created.
    pub fn supermarket(&self) -> Result<Supermarket<'a>, FixtureError> {
        let currency = self.currency()?;

        let mut supermarket = Supermarket::new(self.items().cloned().collect::<Vec<_>>(), currency)?;

        for item in self.purchases() {
            supermarket.buy(item)?;
        }

        Ok(supermarket)
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog has been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    fn check_currency(&mut self, currency: &'static Currency) -> Result<(), FixtureError> {
        match self.currency {
            Some(existing) if existing != currency => Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            )),
            Some(_) => Ok(()),
            None => {
                self.currency = Some(currency);
                Ok(())
            }
        }
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use rusty_money::{
        Money,
        iso::{GBP, USD},
    };
    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    fn write_fixture(base: &Path, category: &str, name: &str, contents: &str) -> TestResult {
        let dir = base.join(category);

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    #[test]
    fn fixture_loads_catalog_and_purchases() -> TestResult {
        let mut fixture = Fixture::new();

        fixture.load_catalog("kata")?.load_purchases("kata")?;

        assert_eq!(fixture.item_keys.len(), 4);
        assert_eq!(fixture.purchases.len(), 7);
        assert_eq!(fixture.currency()?, GBP);

        let a = fixture.item("a")?;

        assert_eq!(a.name(), "A");
        assert_eq!(a.price(), &Money::from_minor(50, GBP));
        assert_eq!(a.discount_threshold(), 3);

        Ok(())
    }

    #[test]
    fn fixture_items_keep_catalog_order() -> TestResult {
        let fixture = Fixture::from_set("kata")?;

        let names: Vec<&str> = fixture.items().map(Item::name).collect();

        assert_eq!(names, ["A", "B", "C", "D"]);

        Ok(())
    }

    #[test]
    fn fixture_supermarket_prices_purchases() -> TestResult {
        let fixture = Fixture::from_set("kata")?;
        let supermarket = fixture.supermarket()?;

        assert_eq!(supermarket.items().len(), 4);
        assert_eq!(supermarket.len(), 7);
        assert_eq!(supermarket.subtotal()?, Money::from_minor(245, GBP));
        assert_eq!(supermarket.total()?, Money::from_minor(210, GBP));

        Ok(())
    }

    #[test]
    fn fixture_item_not_found_returns_error() {
        let fixture = Fixture::new();
        let result = fixture.item("nonexistent");

        assert!(matches!(result, Err(FixtureError::ItemNotFound(_))));
    }

    #[test]
    fn fixture_no_currency_returns_error() {
        let fixture = Fixture::new();

        assert!(matches!(fixture.currency(), Err(FixtureError::NoCurrency)));
        assert!(matches!(
            fixture.supermarket(),
            Err(FixtureError::NoCurrency)
        ));
    }

    #[test]
    fn fixture_missing_file_returns_io_error() -> TestResult {
        let dir = TempDir::new()?;
        let mut fixture = Fixture::with_base_path(dir.path());

        assert!(matches!(
            fixture.load_catalog("missing"),
            Err(FixtureError::Io(_))
        ));

        Ok(())
    }

    #[test]
    fn fixture_load_catalog_rejects_currency_mismatch() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(
            dir.path(),
            "catalogs",
            "mixed",
            "items:\n  - key: apple\n    name: Apple\n    price: 1.00 USD\n  - key: banana\n    name: Banana\n    price: 1.00 GBP\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        let result = fixture.load_catalog("mixed");

        assert!(matches!(result, Err(FixtureError::CurrencyMismatch(_, _))));

        Ok(())
    }

    #[test]
    fn fixture_load_catalog_sets_currency_from_prices() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(
            dir.path(),
            "catalogs",
            "dollars",
            "items:\n  - key: apple\n    name: Apple\n    price: 0.40 USD\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_catalog("dollars")?;

        assert_eq!(fixture.currency()?, USD);
        assert_eq!(fixture.item("apple")?.price(), &Money::from_minor(40, USD));

        Ok(())
    }

    #[test]
    fn fixture_load_catalog_rejects_duplicate_keys() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(
            dir.path(),
            "catalogs",
            "dupes",
            "items:\n  - key: apple\n    name: Apple\n    price: 1.00 GBP\n  - key: apple\n    name: Green Apple\n    price: 1.20 GBP\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        assert!(matches!(
            fixture.load_catalog("dupes"),
            Err(FixtureError::DuplicateItem(key)) if key == "apple"
        ));

        Ok(())
    }

    #[test]
    fn fixture_load_catalog_rejects_invalid_yaml() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(dir.path(), "catalogs", "broken", "items: [")?;

        let mut fixture = Fixture::with_base_path(dir.path());

        assert!(matches!(
            fixture.load_catalog("broken"),
            Err(FixtureError::Yaml(_))
        ));

        Ok(())
    }

    #[test]
    fn fixture_load_purchases_rejects_unknown_item() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(
            dir.path(),
            "catalogs",
            "small",
            "items:\n  - key: apple\n    name: Apple\n    price: 0.40 GBP\n",
        )?;
        write_fixture(dir.path(), "purchases", "small", "purchases: [apple, pear]\n")?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_catalog("small")?;

        assert!(matches!(
            fixture.load_purchases("small"),
            Err(FixtureError::ItemNotFound(key)) if key == "pear"
        ));

        Ok(())
    }

    #[test]
    fn fixture_default_matches_new() {
        let fixture = Fixture::default();

        assert_eq!(fixture.base_path, PathBuf::from("./fixtures"));
        assert!(fixture.catalog.is_empty());
        assert!(fixture.purchases.is_empty());
    }
}
