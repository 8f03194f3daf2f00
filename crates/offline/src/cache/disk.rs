//! # Disk Store
//!
//! Persistent layer backing a cache partition. Each entry is a body file
//! named by the key's SHA-256 plus a `.meta` JSON sidecar carrying status
//! and headers. Writes go to temporary files first and are renamed into
//! place so a crash never leaves a half-written entry visible.

use std::path::PathBuf;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io;
use tracing::{debug, warn};

use crate::cache::types::{CacheKey, CacheResult};
use crate::response::ResponseSnapshot;

/// Serialized sidecar for a persisted entry
#[derive(Debug, Serialize, Deserialize)]
struct EntryMeta {
    status: u16,
    status_text: String,
    headers: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct DiskStore {
    dir: PathBuf,
    initialized: std::sync::Arc<std::sync::atomic::AtomicBool>,
}

impl DiskStore {
    /// Create a disk store rooted at the given partition directory
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            initialized: std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false)),
        }
    }

    /// Directory this store persists into
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    async fn ensure_initialized(&self) -> io::Result<()> {
        use std::sync::atomic::Ordering;

        if self.initialized.load(Ordering::Relaxed) {
            return Ok(());
        }

        if self
            .initialized
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            fs::create_dir_all(&self.dir).await?;
            self.initialized.store(true, Ordering::Release);
        } else {
            while !self.initialized.load(Ordering::Acquire) {
                tokio::task::yield_now().await;
            }
        }

        Ok(())
    }

    fn data_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.to_filename())
    }

    fn meta_path(&self, key: &CacheKey) -> PathBuf {
        let mut path = self.data_path(key);
        path.set_extension("meta");
        path
    }

    /// Look up a persisted entry. Corrupt entries are removed in the
    /// background and reported as a miss.
    pub async fn lookup(&self, key: &CacheKey) -> CacheResult<Option<ResponseSnapshot>> {
        self.ensure_initialized().await?;

        let data_path = self.data_path(key);
        let meta_path = self.meta_path(key);

        if !fs::try_exists(&data_path).await? || !fs::try_exists(&meta_path).await? {
            return Ok(None);
        }

        let meta_bytes = match fs::read(&meta_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = ?meta_path, error = %e, "Failed to read entry metadata file");
                return Ok(None);
            }
        };

        let meta: EntryMeta = match serde_json::from_slice(&meta_bytes) {
            Ok(m) => m,
            Err(e) => {
                warn!(path = ?meta_path, error = %e, "Failed to parse entry metadata");

                // Delete the invalid entry as a background task
                let data_path = data_path.clone();
                let meta_path = meta_path.clone();
                tokio::spawn(async move {
                    let _ = fs::remove_file(&data_path).await;
                    let _ = fs::remove_file(&meta_path).await;
                });

                return Ok(None);
            }
        };

        let body = match fs::read(&data_path).await {
            Ok(bytes) => Bytes::from(bytes),
            Err(e) => {
                warn!(path = ?data_path, error = %e, "Failed to read entry body file");
                return Ok(None);
            }
        };

        Ok(Some(ResponseSnapshot {
            status: meta.status,
            status_text: meta.status_text,
            headers: meta.headers,
            body,
        }))
    }

    /// Persist an entry, overwriting any previous snapshot for the key
    pub async fn put(&self, key: &CacheKey, snapshot: &ResponseSnapshot) -> CacheResult<()> {
        self.ensure_initialized().await?;

        let data_path = self.data_path(key);
        let meta_path = self.meta_path(key);

        let meta = EntryMeta {
            status: snapshot.status,
            status_text: snapshot.status_text.clone(),
            headers: snapshot.headers.clone(),
        };
        let meta_json = serde_json::to_vec(&meta)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let temp_data_path = data_path.with_extension("tmp");
        let temp_meta_path = meta_path.with_extension("mtmp");

        fs::write(&temp_data_path, &snapshot.body).await?;
        if let Err(e) = fs::write(&temp_meta_path, &meta_json).await {
            let _ = fs::remove_file(&temp_data_path).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_data_path, &data_path).await {
            let _ = fs::remove_file(&temp_data_path).await;
            let _ = fs::remove_file(&temp_meta_path).await;
            return Err(e);
        }
        if let Err(e) = fs::rename(&temp_meta_path, &meta_path).await {
            // Body renamed but metadata did not: remove the body so the
            // entry stays consistent.
            let _ = fs::remove_file(&data_path).await;
            let _ = fs::remove_file(&temp_meta_path).await;
            return Err(e);
        }

        debug!(key = ?key, "Persisted cache entry to disk");
        Ok(())
    }

    /// Delete the whole partition directory
    pub async fn purge(&self) -> CacheResult<()> {
        self.initialized
            .store(false, std::sync::atomic::Ordering::Relaxed);
        match fs::remove_dir_all(&self.dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                warn!(dir = ?self.dir, error = %e, "Failed to remove partition directory");
                Err(e)
            }
        }
    }
}
