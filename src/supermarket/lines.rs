//! Purchase Lines

use rustc_hash::FxHashMap;

use crate::{
    items::Item,
    pricing::{LinePrice, PricingError, price_quantity},
};

/// One item definition and the number of units bought.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PurchaseLine<'s, 'a> {
    item: &'s Item<'a>,
    quantity: usize,
}

impl<'s, 'a> PurchaseLine<'s, 'a> {
    /// The item definition
    pub fn item(&self) -> &'s Item<'a> {
        self.item
    }

    /// Units bought
    pub fn quantity(&self) -> usize {
        self.quantity
    }

    /// Price the line, applying the item's bulk discount.
    ///
    /// # Errors
    ///
    /// Returns a `PricingError` if the amount overflows or there was a money arithmetic error.
    pub fn price(&self) -> Result<LinePrice<'a>, PricingError> {
        price_quantity(self.item, self.quantity)
    }
}

/// Group purchased items by definition, in order of first purchase.
pub fn group_purchases<'s, 'a>(bought: &'s [Item<'a>]) -> Vec<PurchaseLine<'s, 'a>> {
    let mut positions: FxHashMap<&'s Item<'a>, usize> = FxHashMap::default();
    let mut lines: Vec<PurchaseLine<'s, 'a>> = Vec::new();

    for item in bought {
        let idx = *positions.entry(item).or_insert_with(|| {
            lines.push(PurchaseLine { item, quantity: 0 });
            lines.len() - 1
        });

        if let Some(line) = lines.get_mut(idx) {
            line.quantity += 1;
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn groups_repeated_items_in_first_purchase_order() -> TestResult {
        let a = Item::new("A", Money::from_minor(50, GBP))?;
        let b = Item::new("B", Money::from_minor(30, GBP))?;
        let bought = [b.clone(), a.clone(), b.clone(), b.clone()];

        let lines = group_purchases(&bought);

        let summary: Vec<(&str, usize)> = lines
            .iter()
            .map(|line| (line.item().name(), line.quantity()))
            .collect();

        assert_eq!(summary, [("B", 3), ("A", 1)]);

        Ok(())
    }

    #[test]
    fn same_name_with_different_pricing_is_separate_line() -> TestResult {
        let plain = Item::new("A", Money::from_minor(50, GBP))?;
        let discounted = Item::with_discount(
            "A",
            Money::from_minor(50, GBP),
            2,
            Money::from_minor(80, GBP),
        )?;
        let bought = [plain.clone(), discounted.clone(), plain, discounted];

        let lines = group_purchases(&bought);

        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line.quantity() == 2));

        let totals = lines
            .iter()
            .map(|line| line.price().map(|price| price.total.to_minor_units()))
            .collect::<Result<Vec<_>, _>>()?;

        assert_eq!(totals, [100, 80]);

        Ok(())
    }

    #[test]
    fn no_purchases_no_lines() {
        assert!(group_purchases(&[]).is_empty());
    }
}
