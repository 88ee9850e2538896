//! Budget entries and the in-memory list that owns them.

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

pub type EntryId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                EntryKind::Income => "income",
                EntryKind::Expense => "expense",
            }
        )
    }
}

impl FromStr for EntryKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(EntryKind::Income),
            "expense" => Ok(EntryKind::Expense),
            _ => Err(anyhow!("Invalid entry type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Salary,
    Freelance,
    Investment,
    Gift,
    Food,
    Transport,
    Housing,
    Utilities,
    Entertainment,
    Health,
    Shopping,
    Education,
    Other,
}

impl Category {
    pub const ALL: [Category; 13] = [
        Category::Salary,
        Category::Freelance,
        Category::Investment,
        Category::Gift,
        Category::Food,
        Category::Transport,
        Category::Housing,
        Category::Utilities,
        Category::Entertainment,
        Category::Health,
        Category::Shopping,
        Category::Education,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Salary => "salary",
            Category::Freelance => "freelance",
            Category::Investment => "investment",
            Category::Gift => "gift",
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Housing => "housing",
            Category::Utilities => "utilities",
            Category::Entertainment => "entertainment",
            Category::Health => "health",
            Category::Shopping => "shopping",
            Category::Education => "education",
            Category::Other => "other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| anyhow!("Invalid category: {}", s))
    }
}

/// A single income or expense record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub label: String,
    pub amount: f64,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub date: DateTime<Utc>,
}

impl Entry {
    /// The entry's own currency, or `display_currency` when it has none.
    pub fn currency_or<'a>(&'a self, display_currency: &'a str) -> &'a str {
        self.currency.as_deref().unwrap_or(display_currency)
    }

    /// Finite non-negative amount and a non-blank label.
    pub fn is_valid(&self) -> bool {
        self.amount.is_finite() && self.amount >= 0.0 && !self.label.trim().is_empty()
    }
}

/// Ordered list of entries, the source of truth for everything derived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryStore {
    entries: Vec<Entry>,
}

impl EntryStore {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Derives a fresh id from the creation time, moved past every existing id
    /// so that two entries created in the same millisecond stay distinct. If
    /// the largest id is already `EntryId::MAX`, the lowest unused id is taken.
    pub fn next_id(&self, now: DateTime<Utc>) -> EntryId {
        let candidate = now.timestamp_millis().max(0) as EntryId;
        match self.entries.iter().map(|e| e.id).max() {
            Some(max) if max >= candidate => max
                .checked_add(1)
                .unwrap_or_else(|| self.lowest_unused_id()),
            _ => candidate,
        }
    }

    fn lowest_unused_id(&self) -> EntryId {
        let mut ids: Vec<EntryId> = self.entries.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        ids.dedup();
        let mut next = 0;
        for id in ids {
            if id != next {
                break;
            }
            next += 1;
        }
        next
    }

    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Swaps the entry with `entry.id` for `entry`. Returns false if no such id.
    pub fn replace(&mut self, entry: Entry) -> bool {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(slot) => {
                *slot = entry;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: EntryId) -> Option<Entry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn entry(
        id: EntryId,
        kind: EntryKind,
        amount: f64,
        currency: Option<&str>,
        day: u32,
    ) -> Entry {
        Entry {
            id,
            kind,
            label: format!("entry {id}"),
            amount,
            category: Category::Other,
            currency: currency.map(str::to_string),
            date: Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_entry_json_shape() {
        let e = entry(7, EntryKind::Expense, 12.5, Some("EUR"), 3);
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["category"], "other");
        assert_eq!(json["currency"], "EUR");
        assert_eq!(json["date"], "2025-06-03T12:00:00Z");

        let no_currency = entry(8, EntryKind::Income, 1.0, None, 3);
        let json = serde_json::to_value(&no_currency).unwrap();
        assert!(json.get("currency").is_none());
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("Food".parse::<Category>().unwrap(), Category::Food);
        assert_eq!(" SALARY ".parse::<Category>().unwrap(), Category::Salary);
        assert!("".parse::<Category>().is_err());
        assert!("rent".parse::<Category>().is_err());
    }

    #[test]
    fn test_next_id_is_unique() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let mut store = EntryStore::default();
        let first = store.next_id(now);
        assert_eq!(first, now.timestamp_millis() as EntryId);

        store.push(entry(first, EntryKind::Income, 1.0, None, 1));
        let second = store.next_id(now);
        assert_eq!(second, first + 1);
    }

    #[test]
    fn test_next_id_after_max_id_reuses_lowest_gap() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let mut store = EntryStore::new(vec![
            entry(0, EntryKind::Income, 1.0, None, 1),
            entry(EntryId::MAX, EntryKind::Income, 1.0, None, 1),
            entry(1, EntryKind::Income, 1.0, None, 1),
        ]);

        let id = store.next_id(now);

        assert_eq!(id, 2);
        store.push(entry(id, EntryKind::Expense, 1.0, None, 2));
        assert_eq!(store.next_id(now), 3);
    }

    #[test]
    fn test_is_valid() {
        assert!(entry(1, EntryKind::Income, 0.0, None, 1).is_valid());

        let mut negative = entry(1, EntryKind::Expense, -50.0, None, 1);
        assert!(!negative.is_valid());
        negative.amount = f64::NAN;
        assert!(!negative.is_valid());

        let mut blank = entry(1, EntryKind::Expense, 5.0, None, 1);
        blank.label = "  ".to_string();
        assert!(!blank.is_valid());
    }

    #[test]
    fn test_replace_touches_only_matching_id() {
        let mut store = EntryStore::new(vec![
            entry(1, EntryKind::Income, 10.0, None, 1),
            entry(2, EntryKind::Expense, 20.0, None, 2),
            entry(3, EntryKind::Expense, 30.0, None, 3),
        ]);
        let before = store.clone();

        let mut updated = store.get(2).unwrap().clone();
        updated.amount = 99.0;
        assert!(store.replace(updated));

        assert_eq!(store.get(2).unwrap().amount, 99.0);
        assert_eq!(store.get(1), before.get(1));
        assert_eq!(store.get(3), before.get(3));
        assert_eq!(store.entries()[1].id, 2);
    }

    #[test]
    fn test_remove_missing_id_leaves_list_unchanged() {
        let mut store = EntryStore::new(vec![
            entry(1, EntryKind::Income, 10.0, None, 1),
            entry(2, EntryKind::Expense, 20.0, None, 2),
        ]);
        let before = store.clone();

        assert!(store.remove(42).is_none());
        assert_eq!(store, before);

        assert_eq!(store.remove(1).map(|e| e.id), Some(1));
        assert_eq!(store.len(), 1);
    }
}
