use crate::core::cache::KeyValueCollection;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// In-memory collection, lost when the process exits.
#[derive(Default)]
pub struct MemoryCollection {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueCollection for MemoryCollection {
    fn get(&self, key: &str) -> Option<String> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let value = map.get(key).cloned();
        if value.is_some() {
            debug!("Store HIT for key: {key}");
        } else {
            debug!("Store MISS for key: {key}");
        }
        value
    }

    fn put(&self, key: &str, value: &str) {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        debug!("Store PUT for key: {key}");
        map.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_get_put() {
        let collection = MemoryCollection::new();

        // Initially, collection is empty
        assert!(collection.get("key1").is_none());

        collection.put("key1", "123");
        assert_eq!(collection.get("key1").as_deref(), Some("123"));

        // Last write wins
        collection.put("key1", "456");
        assert_eq!(collection.get("key1").as_deref(), Some("456"));

        assert!(collection.get("key2").is_none());
    }
}
