//! Stages a pending entry and turns it into a create or an in-place edit.

use crate::core::entry::{Category, Entry, EntryId, EntryKind, EntryStore};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("amount '{0}' is not a number")]
    AmountNotNumeric(String),
    #[error("amount {0} is negative")]
    AmountNegative(f64),
    #[error("label is blank")]
    BlankLabel,
    #[error("category is empty")]
    EmptyCategory,
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
}

/// Raw field values as typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub kind: EntryKind,
    pub label: String,
    pub amount: String,
    pub category: String,
    pub currency: Option<String>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            kind: EntryKind::Expense,
            label: String::new(),
            amount: String::new(),
            category: String::new(),
            currency: None,
        }
    }
}

impl Draft {
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            kind: entry.kind,
            label: entry.label.clone(),
            amount: entry.amount.to_string(),
            category: entry.category.to_string(),
            currency: entry.currency.clone(),
        }
    }
}

/// A draft that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDraft {
    pub kind: EntryKind,
    pub label: String,
    pub amount: f64,
    pub category: Category,
    pub currency: Option<String>,
}

pub fn validate(draft: &Draft) -> Result<ValidDraft, ValidationError> {
    let amount_text = draft.amount.trim();
    let amount: f64 = amount_text
        .parse()
        .map_err(|_| ValidationError::AmountNotNumeric(amount_text.to_string()))?;
    if !amount.is_finite() {
        return Err(ValidationError::AmountNotNumeric(amount_text.to_string()));
    }
    if amount < 0.0 {
        return Err(ValidationError::AmountNegative(amount));
    }

    let label = draft.label.trim();
    if label.is_empty() {
        return Err(ValidationError::BlankLabel);
    }

    let category_text = draft.category.trim();
    if category_text.is_empty() {
        return Err(ValidationError::EmptyCategory);
    }
    let category = category_text
        .parse::<Category>()
        .map_err(|_| ValidationError::UnknownCategory(category_text.to_string()))?;

    let currency = draft
        .currency
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_uppercase);

    Ok(ValidDraft {
        kind: draft.kind,
        label: label.to_string(),
        amount,
        category,
        currency,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(EntryId),
}

/// Holds the staged draft and the optional edit target.
#[derive(Debug, Clone, Default)]
pub struct FormController {
    editing: Option<EntryId>,
    draft: Draft,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> FormMode {
        match self.editing {
            Some(id) => FormMode::Edit(id),
            None => FormMode::Create,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    pub fn set_draft(&mut self, draft: Draft) {
        self.draft = draft;
    }

    /// Switches to edit mode with the entry's current fields staged.
    pub fn begin_edit(&mut self, entry: &Entry) {
        self.editing = Some(entry.id);
        self.draft = Draft::from_entry(entry);
    }

    /// Drops staged changes and goes back to create mode.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.draft = Draft::default();
    }

    /// Applies the staged draft to `store`.
    ///
    /// Returns the id of the created or edited entry, or `None` when the draft is
    /// invalid or the edit target has gone away. Rejections leave the store and
    /// the staged draft untouched.
    pub fn submit(&mut self, store: &mut EntryStore, now: DateTime<Utc>) -> Option<EntryId> {
        let valid = match validate(&self.draft) {
            Ok(valid) => valid,
            Err(e) => {
                debug!("Ignoring form submission: {e}");
                return None;
            }
        };

        match self.editing {
            None => {
                let id = store.next_id(now);
                store.push(Entry {
                    id,
                    kind: valid.kind,
                    label: valid.label,
                    amount: valid.amount,
                    category: valid.category,
                    currency: valid.currency,
                    date: now,
                });
                debug!("Created entry {id}");
                self.draft = Draft::default();
                Some(id)
            }
            Some(id) => {
                let Some(date) = store.get(id).map(|e| e.date) else {
                    debug!("Edit target {id} no longer exists");
                    self.cancel_edit();
                    return None;
                };
                store.replace(Entry {
                    id,
                    kind: valid.kind,
                    label: valid.label,
                    amount: valid.amount,
                    category: valid.category,
                    currency: valid.currency,
                    date,
                });
                debug!("Updated entry {id}");
                self.cancel_edit();
                Some(id)
            }
        }
    }
}
