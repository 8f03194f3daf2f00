//! # Cache Store
//!
//! Registry of named cache partitions. Opening a partition creates it on
//! first use; deletion is wholesale and driven only by lifecycle
//! activation, which keeps exactly the current version's static and API
//! partitions alive.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::fs;
use tracing::{debug, info};

use crate::cache::disk::DiskStore;
use crate::cache::partition::CachePartition;
use crate::cache::types::CacheResult;

pub struct CacheStore {
    disk_root: Option<PathBuf>,
    partitions: RwLock<HashMap<String, Arc<CachePartition>>>,
}

impl CacheStore {
    /// Create a store; with a disk root, partitions persist across restarts
    pub fn new(disk_root: Option<PathBuf>) -> Self {
        Self {
            disk_root,
            partitions: RwLock::new(HashMap::new()),
        }
    }

    /// Open a partition by name, creating it on first use
    pub fn open(&self, name: &str) -> Arc<CachePartition> {
        if let Some(partition) = self.partitions.read().get(name) {
            return Arc::clone(partition);
        }

        let mut partitions = self.partitions.write();
        // Re-check under the write lock.
        if let Some(partition) = partitions.get(name) {
            return Arc::clone(partition);
        }

        let disk = self
            .disk_root
            .as_ref()
            .map(|root| DiskStore::new(root.join(name)));
        let partition = Arc::new(CachePartition::new(name, disk));
        partitions.insert(name.to_string(), Arc::clone(&partition));
        debug!(partition = name, "Opened cache partition");
        partition
    }

    /// Names of all known partitions: open ones plus any persisted on disk
    /// from a previous run.
    pub async fn partition_names(&self) -> CacheResult<Vec<String>> {
        let mut names: Vec<String> = self.partitions.read().keys().cloned().collect();

        if let Some(root) = &self.disk_root {
            if fs::try_exists(root).await? {
                let mut entries = fs::read_dir(root).await?;
                while let Some(entry) = entries.next_entry().await? {
                    if entry.file_type().await?.is_dir() {
                        let name = entry.file_name().to_string_lossy().to_string();
                        if !names.contains(&name) {
                            names.push(name);
                        }
                    }
                }
            }
        }

        names.sort();
        Ok(names)
    }

    /// Delete every partition whose name is not in the keep list, returning
    /// the names that were removed. Used only by lifecycle activation.
    pub async fn delete_except(&self, keep: &[String]) -> CacheResult<Vec<String>> {
        let all = self.partition_names().await?;
        let mut deleted = Vec::new();

        for name in all {
            if keep.contains(&name) {
                continue;
            }

            let removed = self.partitions.write().remove(&name);
            if let Some(partition) = removed {
                partition.purge_disk().await?;
            } else if let Some(root) = &self.disk_root {
                // Disk-only partition from a previous run.
                DiskStore::new(root.join(&name)).purge().await?;
            }

            info!(partition = %name, "Deleted superseded cache partition");
            deleted.push(name);
        }

        Ok(deleted)
    }
}
