//! Key-value storage abstractions

use std::sync::Arc;

/// A named bag of string values.
///
/// Access is synchronous and best-effort: implementations log failures and
/// report them as a missing value or a dropped write.
pub trait KeyValueCollection: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn put(&self, key: &str, value: &str);
}

pub trait Store: Send + Sync {
    /// Opens (creating if needed) the collection called `name`. Persistent
    /// collections fall back to memory when the backing store is unavailable.
    fn get_collection(&self, name: &str, persist: bool) -> Arc<dyn KeyValueCollection>;
}
