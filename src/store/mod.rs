pub mod disk;
pub mod memory;

use crate::core::cache::{KeyValueCollection, Store};
use disk::DiskCollection;
use fjall::{Keyspace, PartitionCreateOptions};
use memory::MemoryCollection;
use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};
use tracing::{debug, warn};

/// Holds the named collections of the application, persisted or not.
pub struct KeyValueStore {
    collections: RwLock<HashMap<String, Arc<dyn KeyValueCollection>>>,
    keyspace: Option<Keyspace>,
}

impl KeyValueStore {
    /// Opens a fjall keyspace under `data_path`. If it can't be opened the store
    /// still works, but only in memory.
    pub fn open(data_path: &Path) -> Self {
        let store_dir = data_path.join("store");
        if let Err(e) = std::fs::create_dir_all(&store_dir) {
            warn!(
                "Could not create {}, using memory: {}",
                store_dir.display(),
                e
            );
            return Self::in_memory();
        }
        let keyspace = match fjall::Config::new(&store_dir).open() {
            Ok(keyspace) => Some(keyspace),
            Err(e) => {
                warn!(
                    "Could not open store at {}, using memory: {}",
                    store_dir.display(),
                    e
                );
                None
            }
        };

        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace: None,
        }
    }

    fn open_disk_collection(&self, name: &str) -> Option<Arc<dyn KeyValueCollection>> {
        let keyspace = self.keyspace.as_ref()?;
        match keyspace.open_partition(name, PartitionCreateOptions::default()) {
            Ok(partition) => Some(
                Arc::new(DiskCollection::new(keyspace.clone(), partition))
                    as Arc<dyn KeyValueCollection>,
            ),
            Err(e) => {
                warn!("Could not open collection {name}, using memory: {e}");
                None
            }
        }
    }
}

impl Store for KeyValueStore {
    fn get_collection(&self, name: &str, persist: bool) -> Arc<dyn KeyValueCollection> {
        {
            let collections = self.collections.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(collection) = collections.get(name) {
                return Arc::clone(collection);
            }
        }

        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let collection = collections.entry(name.to_string()).or_insert_with(|| {
            debug!("Creating collection {name} (persist: {persist})");
            let disk = if persist {
                self.open_disk_collection(name)
            } else {
                None
            };
            disk.unwrap_or_else(|| {
                Arc::new(MemoryCollection::new()) as Arc<dyn KeyValueCollection>
            })
        });
        Arc::clone(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_collections_are_shared_by_name() {
        let store = KeyValueStore::in_memory();

        let a = store.get_collection("budget", false);
        a.put("currency", "EUR");
        let b = store.get_collection("budget", false);

        assert_eq!(b.get("currency").as_deref(), Some("EUR"));
        assert!(store.get_collection("other", false).get("currency").is_none());
    }

    #[test]
    fn test_persistent_collection_falls_back_to_memory() {
        let store = KeyValueStore::in_memory();

        let collection = store.get_collection("budget", true);
        collection.put("dark_mode", "enabled");
        assert_eq!(collection.get("dark_mode").as_deref(), Some("enabled"));
    }

    #[test]
    fn test_disk_store_persists() {
        let dir = tempdir().unwrap();
        {
            let store = KeyValueStore::open(dir.path());
            store.get_collection("budget", true).put("currency", "INR");
        }

        let store = KeyValueStore::open(dir.path());
        assert_eq!(
            store.get_collection("budget", true).get("currency").as_deref(),
            Some("INR")
        );
    }
}
