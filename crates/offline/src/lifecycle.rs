//! # Worker Lifecycle
//!
//! Install, activate and update propagation. Install pre-populates the
//! static partition from the configured manifest and must succeed as a
//! unit; a failed install is surfaced to the host runtime's retry policy
//! and the previous version stays active. Activation deletes every cache
//! partition from prior versions and claims the open clients. Applying an
//! update is a two-step handshake: the host sends a skip-waiting message,
//! the waiting instance activates, and the host reloads.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cache::{CacheKey, CacheStore};
use crate::clients::ClientRegistry;
use crate::config::WorkerConfig;
use crate::error::OfflineError;
use crate::fetch::{Destination, FetchRequest};
use crate::fetcher::Fetcher;

/// Worker lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Install event in progress
    Installing,
    /// Installed successfully, waiting to activate
    Installed,
    /// Activate event in progress
    Activating,
    /// Active and controlling clients
    Active,
    /// Replaced by a newer version
    Superseded,
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerState::Installing => write!(f, "installing"),
            WorkerState::Installed => write!(f, "installed"),
            WorkerState::Activating => write!(f, "activating"),
            WorkerState::Active => write!(f, "active"),
            WorkerState::Superseded => write!(f, "superseded"),
        }
    }
}

/// Control message sent from the host page to the worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkerMessage {
    /// Ask a waiting instance to activate immediately
    #[serde(rename = "SKIP_WAITING")]
    SkipWaiting,
    /// Ask for the active cache-version string
    #[serde(rename = "GET_VERSION")]
    GetVersion,
}

/// Reply sent from the worker back to the host page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkerReply {
    #[serde(rename = "VERSION")]
    Version { version: String },
}

/// State machine governing which cache version is authoritative
pub struct LifecycleManager {
    state: RwLock<WorkerState>,
    skip_waiting: AtomicBool,
}

impl LifecycleManager {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(WorkerState::Installing),
            skip_waiting: AtomicBool::new(false),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> WorkerState {
        *self.state.read()
    }

    fn set_state(&self, new_state: WorkerState) {
        let mut state = self.state.write();
        debug!(from = %*state, to = %new_state, "Worker state transition");
        *state = new_state;
    }

    /// Whether immediate activation has been requested
    pub fn skip_waiting_requested(&self) -> bool {
        self.skip_waiting.load(Ordering::Acquire)
    }

    /// Request immediate activation (install-time eligibility or a host
    /// skip-waiting message)
    pub fn request_skip_waiting(&self) {
        self.skip_waiting.store(true, Ordering::Release);
    }

    /// Mark this instance as replaced by a newer version
    pub fn supersede(&self) {
        self.set_state(WorkerState::Superseded);
    }

    /// Pre-populate the static partition with the configured manifest and
    /// open the API partition.
    ///
    /// All-or-nothing: the first asset that cannot be fetched successfully
    /// aborts the install with an error, leaving the previous version
    /// active and the host runtime free to retry.
    pub async fn install(
        &self,
        config: &WorkerConfig,
        store: &CacheStore,
        fetcher: &dyn Fetcher,
    ) -> Result<(), OfflineError> {
        let state = self.state();
        if state != WorkerState::Installing {
            return Err(OfflineError::InvalidState {
                expected: "installing",
                actual: state,
            });
        }

        let static_partition = store.open(&config.static_partition_name());

        for path in &config.static_manifest {
            let url = config.asset_url(path);
            let request = FetchRequest::get(url.clone(), Destination::Empty);

            let response = fetcher.fetch(&request).await.map_err(|e| {
                OfflineError::InstallFailed {
                    url: url.clone(),
                    reason: e.to_string(),
                }
            })?;

            if !response.is_success() {
                return Err(OfflineError::InstallFailed {
                    url,
                    reason: format!("status {}", response.status),
                });
            }

            static_partition
                .put(CacheKey::new("GET", url), response)
                .await?;
        }

        // Open, but do not populate, the API partition.
        store.open(&config.api_partition_name());

        // New installs are eligible to activate without waiting for old
        // instances to finish.
        self.request_skip_waiting();
        self.set_state(WorkerState::Installed);

        info!(
            version = %config.version,
            assets = config.static_manifest.len(),
            "Install complete, static partition populated"
        );
        Ok(())
    }

    /// Evict cache partitions from prior versions and claim the clients.
    ///
    /// Returns the names of the deleted partitions.
    pub async fn activate(
        &self,
        config: &WorkerConfig,
        store: &CacheStore,
        clients: &dyn ClientRegistry,
    ) -> Result<Vec<String>, OfflineError> {
        let state = self.state();
        if state != WorkerState::Installed {
            return Err(OfflineError::InvalidState {
                expected: "installed",
                actual: state,
            });
        }
        self.set_state(WorkerState::Activating);

        let keep = vec![config.static_partition_name(), config.api_partition_name()];
        let deleted = store.delete_except(&keep).await?;

        clients.claim().await;
        self.set_state(WorkerState::Active);

        info!(version = %config.version, deleted = deleted.len(), "Activation complete");
        Ok(deleted)
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}
