//! # Cache Partition
//!
//! A named, versioned bucket of request/response pairs. Lookups consult the
//! in-memory map first and fall back to the disk layer, promoting disk hits
//! into memory. A miss is a normal outcome, never an error. Writes are
//! last-writer-wins at entry granularity; nothing here ever deletes single
//! entries — only the lifecycle manager deletes partitions wholesale.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::cache::disk::DiskStore;
use crate::cache::types::{CacheKey, CacheResult};
use crate::response::ResponseSnapshot;

pub struct CachePartition {
    name: String,
    entries: RwLock<HashMap<CacheKey, ResponseSnapshot>>,
    disk: Option<DiskStore>,
}

impl CachePartition {
    /// Create a partition with the given name and optional disk layer
    pub fn new(name: impl Into<String>, disk: Option<DiskStore>) -> Self {
        Self {
            name: name.into(),
            entries: RwLock::new(HashMap::new()),
            disk,
        }
    }

    /// Partition name, including the embedded version tag
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up the snapshot stored for a key.
    ///
    /// Disk hits are promoted into the memory layer for faster access next
    /// time. Returns `None` on miss.
    pub async fn lookup(&self, key: &CacheKey) -> Option<ResponseSnapshot> {
        if let Some(snapshot) = self.entries.read().get(key) {
            return Some(snapshot.clone());
        }

        if let Some(disk) = &self.disk {
            match disk.lookup(key).await {
                Ok(Some(snapshot)) => {
                    debug!(partition = %self.name, key = ?key, "Promoting disk entry into memory");
                    self.entries.write().insert(key.clone(), snapshot.clone());
                    return Some(snapshot);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(partition = %self.name, key = ?key, error = %e, "Disk lookup failed");
                }
            }
        }

        None
    }

    /// Store a snapshot for a key, replacing any previous entry.
    ///
    /// A disk-layer failure is reported but the memory write stands, so a
    /// full disk never breaks request resolution.
    pub async fn put(&self, key: CacheKey, snapshot: ResponseSnapshot) -> CacheResult<()> {
        self.entries.write().insert(key.clone(), snapshot.clone());

        if let Some(disk) = &self.disk {
            disk.put(&key, &snapshot).await?;
        }

        Ok(())
    }

    /// Whether an entry exists for the key in the memory layer
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Snapshot of all keys currently held in memory
    pub fn keys(&self) -> Vec<CacheKey> {
        self.entries.read().keys().cloned().collect()
    }

    /// Number of entries in the memory layer
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the memory layer holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Remove the partition's persistent storage, if any
    pub(crate) async fn purge_disk(&self) -> CacheResult<()> {
        if let Some(disk) = &self.disk {
            disk.purge().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(url: &str) -> CacheKey {
        CacheKey::new("GET", url)
    }

    #[tokio::test]
    async fn test_put_lookup_hit() {
        let partition = CachePartition::new("nexo-static-v1", None);
        let k = key("https://nexo.app/logo.png");
        let snapshot = ResponseSnapshot::ok("png-bytes");

        partition.put(k.clone(), snapshot.clone()).await.unwrap();
        assert_eq!(partition.lookup(&k).await, Some(snapshot));
    }

    #[tokio::test]
    async fn test_lookup_miss_is_none() {
        let partition = CachePartition::new("nexo-static-v1", None);
        assert!(partition.lookup(&key("https://nexo.app/none")).await.is_none());
    }

    #[tokio::test]
    async fn test_repeated_identical_put_is_idempotent() {
        let partition = CachePartition::new("nexo-static-v1", None);
        let k = key("https://nexo.app/app.css");
        let snapshot = ResponseSnapshot::ok("body { margin: 0 }");

        partition.put(k.clone(), snapshot.clone()).await.unwrap();
        partition.put(k.clone(), snapshot.clone()).await.unwrap();

        assert_eq!(partition.len(), 1);
        assert_eq!(partition.lookup(&k).await, Some(snapshot));
    }

    #[tokio::test]
    async fn test_put_is_last_writer_wins() {
        let partition = CachePartition::new("nexo-api-v1", None);
        let k = key("https://nexo.app/api/posts");

        partition.put(k.clone(), ResponseSnapshot::ok("old")).await.unwrap();
        partition.put(k.clone(), ResponseSnapshot::ok("new")).await.unwrap();

        let hit = partition.lookup(&k).await.unwrap();
        assert_eq!(hit.body, bytes::Bytes::from("new"));
        assert_eq!(partition.len(), 1);
    }

    #[tokio::test]
    async fn test_disk_hit_is_promoted_into_memory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nexo-static-v1");

        // First partition instance persists the entry.
        let first = CachePartition::new("nexo-static-v1", Some(DiskStore::new(dir.clone())));
        let k = key("https://nexo.app/index.html");
        let snapshot = ResponseSnapshot::ok("<html></html>");
        first.put(k.clone(), snapshot.clone()).await.unwrap();

        // A fresh instance over the same directory sees it via disk.
        let second = CachePartition::new("nexo-static-v1", Some(DiskStore::new(dir)));
        assert!(!second.contains(&k));
        assert_eq!(second.lookup(&k).await, Some(snapshot));
        assert!(second.contains(&k));
    }
}
