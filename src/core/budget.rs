//! Application state and every transition on it.
//!
//! [`Budget`] owns the entry list, the display preferences and the form, and
//! writes each change back to its storage collection. Derived views (summary,
//! visible entries) are computed on demand from the current state.

use crate::core::cache::KeyValueCollection;
use crate::core::entry::{Entry, EntryId, EntryStore};
use crate::core::form::{Draft, FormController, FormMode};
use crate::core::rates::RateCache;
use crate::core::summary::{Summary, summarize};
use crate::core::theme::Theme;
use crate::core::view::{Filter, visible_entries};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

pub const ENTRIES_KEY: &str = "entries";
pub const CURRENCY_KEY: &str = "currency";
pub const DARK_MODE_KEY: &str = "dark_mode";

pub struct Budget {
    entries: EntryStore,
    display_currency: String,
    theme: Theme,
    form: FormController,
    filter: Filter,
    pending_delete: Option<EntryId>,
    storage: Arc<dyn KeyValueCollection>,
    rates: RateCache,
}

impl Budget {
    /// Restores state from `storage`. Anything missing or unreadable falls back
    /// to an empty list, `default_currency` and the light theme.
    pub fn load(
        storage: Arc<dyn KeyValueCollection>,
        rates: RateCache,
        default_currency: &str,
    ) -> Self {
        let entries = storage
            .get(ENTRIES_KEY)
            .and_then(|raw| match serde_json::from_str::<Vec<Entry>>(&raw) {
                Ok(entries) => Some(entries),
                Err(e) => {
                    debug!("Ignoring unreadable stored entries: {e}");
                    None
                }
            })
            .unwrap_or_default()
            .into_iter()
            .filter(|entry| {
                let valid = entry.is_valid();
                if !valid {
                    debug!("Ignoring invalid stored entry {}", entry.id);
                }
                valid
            })
            .collect::<Vec<_>>();

        let display_currency = storage
            .get(CURRENCY_KEY)
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| default_currency.to_uppercase());

        let theme = storage
            .get(DARK_MODE_KEY)
            .and_then(|flag| Theme::from_flag(flag.trim()))
            .unwrap_or_default();

        debug!(
            entries = entries.len(),
            %display_currency,
            %theme,
            "Loaded budget state"
        );

        Self {
            entries: EntryStore::new(entries),
            display_currency,
            theme,
            form: FormController::new(),
            filter: Filter::All,
            pending_delete: None,
            storage,
            rates,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        self.entries.entries()
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(id)
    }

    pub fn display_currency(&self) -> &str {
        &self.display_currency
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn rates(&self) -> &RateCache {
        &self.rates
    }

    pub fn form_mode(&self) -> FormMode {
        self.form.mode()
    }

    pub fn draft(&self) -> &Draft {
        self.form.draft()
    }

    pub fn stage(&mut self, draft: Draft) {
        self.form.set_draft(draft);
    }

    /// Enters edit mode for `id`. Returns false if there is no such entry.
    pub fn begin_edit(&mut self, id: EntryId) -> bool {
        match self.entries.get(id) {
            Some(entry) => {
                self.form.begin_edit(entry);
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.form.cancel_edit();
    }

    /// Submits the staged draft, persisting on success.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Option<EntryId> {
        let id = self.form.submit(&mut self.entries, now)?;
        self.save_entries();
        Some(id)
    }

    /// Stages `id` for deletion and returns the entry to confirm against.
    pub fn request_delete(&mut self, id: EntryId) -> Option<&Entry> {
        let entry = self.entries.get(id);
        self.pending_delete = entry.map(|e| e.id);
        if entry.is_none() {
            debug!("Delete requested for unknown entry {id}");
        }
        entry
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Removes the entry staged by [`Budget::request_delete`].
    pub fn confirm_delete(&mut self) -> Option<Entry> {
        let id = self.pending_delete.take()?;
        let removed = self.entries.remove(id)?;
        if self.form.mode() == FormMode::Edit(id) {
            self.form.cancel_edit();
        }
        self.save_entries();
        debug!("Deleted entry {id}");
        Some(removed)
    }

    pub fn set_display_currency(&mut self, code: &str) {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return;
        }
        self.storage.put(CURRENCY_KEY, &code);
        self.display_currency = code;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.storage.put(DARK_MODE_KEY, theme.as_flag());
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggled());
        self.theme
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn summary(&self) -> Summary {
        summarize(
            self.entries.entries(),
            &self.display_currency,
            &self.rates.current(),
        )
    }

    pub fn visible(&self) -> Vec<&Entry> {
        visible_entries(self.entries.entries(), self.filter)
    }

    fn save_entries(&self) {
        match serde_json::to_string(self.entries.entries()) {
            Ok(json) => self.storage.put(ENTRIES_KEY, &json),
            Err(e) => debug!("Failed to serialize entries: {e}"),
        }
    }
}
