//! Core business logic abstractions

pub mod budget;
pub mod cache;
pub mod config;
pub mod currency;
pub mod entry;
pub mod form;
pub mod log;
pub mod rates;
pub mod summary;
pub mod theme;
pub mod view;

// Re-export main types for cleaner imports
pub use budget::Budget;
pub use currency::{RateProvider, RateTable, convert};
pub use entry::{Category, Entry, EntryId, EntryKind};
pub use rates::RateCache;
