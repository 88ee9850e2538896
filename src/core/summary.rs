//! Aggregates entries into totals in a single display currency.
use crate::core::currency::{RateTable, convert};
use crate::core::entry::{Category, Entry, EntryKind};
use std::collections::BTreeMap;
use tracing::debug;

/// Totals of a set of entries, all expressed in `currency`.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub currency: String,
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub entry_count: usize,
    /// Converted totals per category, split by entry kind.
    pub by_category: BTreeMap<(EntryKind, Category), f64>,
}

/// Converts every entry into `display_currency` and sums by kind.
///
/// Entries without a currency are taken to already be in the display currency.
/// Nothing is cached: callers recompute whenever entries, display currency or
/// rates change.
pub fn summarize(entries: &[Entry], display_currency: &str, rates: &RateTable) -> Summary {
    let mut total_income = 0.0;
    let mut total_expenses = 0.0;
    let mut by_category = BTreeMap::new();

    for entry in entries {
        let from = entry.currency_or(display_currency);
        let converted = convert(entry.amount, from, display_currency, rates);
        match entry.kind {
            EntryKind::Income => total_income += converted,
            EntryKind::Expense => total_expenses += converted,
        }
        *by_category
            .entry((entry.kind, entry.category))
            .or_insert(0.0) += converted;
    }

    debug!(
        entries = entries.len(),
        total_income, total_expenses, "Summarized entries in {display_currency}"
    );

    Summary {
        currency: display_currency.to_string(),
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
        entry_count: entries.len(),
        by_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::tests::entry;
    use std::collections::HashMap;

    fn rates() -> RateTable {
        RateTable::new("USD", HashMap::from([("EUR".to_string(), 0.9)])).normalized()
    }

    #[test]
    fn test_mixed_currency_summary() {
        let entries = vec![
            entry(1, EntryKind::Income, 1000.0, Some("USD"), 1),
            entry(2, EntryKind::Expense, 200.0, Some("EUR"), 2),
        ];

        let summary = summarize(&entries, "USD", &rates());

        assert_eq!(summary.total_income, 1000.0);
        assert!((summary.total_expenses - 222.22).abs() < 0.01);
        assert!((summary.balance - 777.78).abs() < 0.01);
        assert_eq!(summary.entry_count, 2);
        assert_eq!(summary.currency, "USD");
    }

    #[test]
    fn test_missing_currency_defaults_to_display() {
        let entries = vec![entry(1, EntryKind::Income, 50.0, None, 1)];

        let summary = summarize(&entries, "EUR", &rates());

        assert_eq!(summary.total_income, 50.0);
        assert_eq!(summary.balance, 50.0);
    }

    #[test]
    fn test_balance_is_income_minus_expenses() {
        let sets = vec![
            vec![],
            vec![entry(1, EntryKind::Expense, 10.0, Some("EUR"), 1)],
            vec![
                entry(1, EntryKind::Income, 3.3, Some("EUR"), 1),
                entry(2, EntryKind::Income, 7.1, None, 2),
                entry(3, EntryKind::Expense, 19.9, Some("GBP"), 3),
                entry(4, EntryKind::Expense, 0.0, Some("USD"), 4),
            ],
        ];

        for entries in sets {
            for display in ["USD", "EUR", "GBP"] {
                let s = summarize(&entries, display, &rates());
                assert_eq!(s.balance, s.total_income - s.total_expenses);
            }
        }
    }

    #[test]
    fn test_display_currency_change_recomputes() {
        let entries = vec![entry(1, EntryKind::Income, 100.0, Some("USD"), 1)];

        let summary = summarize(&entries, "EUR", &rates());

        assert!((summary.total_income - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_by_category_totals() {
        let mut food = entry(1, EntryKind::Expense, 20.0, None, 1);
        food.category = Category::Food;
        let mut more_food = entry(2, EntryKind::Expense, 5.0, None, 2);
        more_food.category = Category::Food;
        let salary = entry(3, EntryKind::Income, 100.0, None, 3);

        let summary = summarize(&[food, more_food, salary], "USD", &rates());

        assert_eq!(
            summary.by_category.get(&(EntryKind::Expense, Category::Food)),
            Some(&25.0)
        );
        assert_eq!(
            summary.by_category.get(&(EntryKind::Income, Category::Other)),
            Some(&100.0)
        );
        let kinds: Vec<_> = summary.by_category.keys().map(|(kind, _)| *kind).collect();
        assert_eq!(kinds, vec![EntryKind::Income, EntryKind::Expense]);
    }
}
