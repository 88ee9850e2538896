use crate::core::entry::{Entry, EntryKind};
use anyhow::anyhow;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Only(EntryKind),
}

impl Filter {
    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(kind) => entry.kind == *kind,
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::All => write!(f, "all"),
            Filter::Only(kind) => write!(f, "{kind}"),
        }
    }
}

impl FromStr for Filter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Filter::All),
            other => other
                .parse::<EntryKind>()
                .map(Filter::Only)
                .map_err(|_| anyhow!("Invalid filter: {}", s)),
        }
    }
}

/// Entries passing `filter`, newest first. Entries sharing a timestamp keep
/// their stored order.
pub fn visible_entries<'a>(entries: &'a [Entry], filter: Filter) -> Vec<&'a Entry> {
    let mut visible: Vec<&Entry> = entries.iter().filter(|e| filter.matches(e)).collect();
    visible.sort_by(|a, b| b.date.cmp(&a.date));
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::tests::entry;

    fn sample() -> Vec<Entry> {
        vec![
            entry(1, EntryKind::Income, 1000.0, Some("USD"), 1),
            entry(2, EntryKind::Expense, 200.0, Some("EUR"), 2),
        ]
    }

    #[test]
    fn test_filter_expense_only() {
        let entries = sample();

        let visible = visible_entries(&entries, Filter::Only(EntryKind::Expense));

        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_filter_all_sorted_newest_first() {
        let entries = sample();

        let visible = visible_entries(&entries, Filter::All);

        let ids: Vec<_> = visible.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1]);
        // underlying order is untouched
        assert_eq!(entries[0].id, 1);
    }

    #[test]
    fn test_equal_dates_keep_insertion_order() {
        let entries = vec![
            entry(5, EntryKind::Expense, 1.0, None, 4),
            entry(3, EntryKind::Expense, 1.0, None, 4),
            entry(9, EntryKind::Expense, 1.0, None, 9),
        ];

        let ids: Vec<_> = visible_entries(&entries, Filter::All)
            .iter()
            .map(|e| e.id)
            .collect();

        assert_eq!(ids, vec![9, 5, 3]);
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!("all".parse::<Filter>().unwrap(), Filter::All);
        assert_eq!(
            "Income".parse::<Filter>().unwrap(),
            Filter::Only(EntryKind::Income)
        );
        assert!("transfers".parse::<Filter>().is_err());
    }
}
