use crate::core::cache::KeyValueCollection;
use anyhow::Result;
use fjall::{Keyspace, PartitionHandle, PersistMode};
use tracing::debug;

/// Collection backed by a fjall partition. Every write is synced before
/// returning so a crash loses at most the write in flight.
pub struct DiskCollection {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskCollection {
    pub fn new(keyspace: Keyspace, partition: PartitionHandle) -> Self {
        Self {
            keyspace,
            partition,
        }
    }

    fn sync(&self) -> Result<()> {
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}

impl KeyValueCollection for DiskCollection {
    fn get(&self, key: &str) -> Option<String> {
        let res: Result<Option<String>> = (|| {
            match self.partition.get(key)? {
                Some(value) => {
                    debug!("Store HIT for key: {key}");
                    Ok(Some(String::from_utf8(value.to_vec())?))
                }
                None => {
                    debug!("Store MISS for key: {key}");
                    Ok(None)
                }
            }
        })();

        match res {
            Ok(val) => val,
            Err(e) => {
                debug!("DiskCollection get error: {}", e);
                None
            }
        }
    }

    fn put(&self, key: &str, value: &str) {
        let res: Result<()> = (|| {
            self.partition.insert(key, value)?;
            self.sync()?;
            debug!("Store PUT for key: {key}");
            Ok(())
        })();
        if let Err(e) = res {
            debug!("DiskCollection put error: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fjall::PartitionCreateOptions;
    use tempfile::tempdir;

    fn open(path: &std::path::Path) -> DiskCollection {
        let keyspace = fjall::Config::new(path).open().unwrap();
        let partition = keyspace
            .open_partition("test", PartitionCreateOptions::default())
            .unwrap();
        DiskCollection::new(keyspace, partition)
    }

    #[test]
    fn test_disk_get_put() {
        let dir = tempdir().unwrap();
        let collection = open(dir.path());

        assert!(collection.get("key1").is_none());

        collection.put("key1", "123");
        assert_eq!(collection.get("key1").as_deref(), Some("123"));
        assert!(collection.get("key2").is_none());
    }

    #[test]
    fn test_disk_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let collection = open(dir.path());
            collection.put("currency", "EUR");
        }

        let reopened = open(dir.path());
        assert_eq!(reopened.get("currency").as_deref(), Some("EUR"));
    }
}
