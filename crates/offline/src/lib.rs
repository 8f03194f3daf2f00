//! # Nexo Offline
//!
//! Offline cache and sync engine for the Nexo application. Intercepted
//! requests are classified once and resolved through cache-first,
//! network-first or stale-while-revalidate strategies against versioned
//! cache partitions.
//!
//! ## Features
//!
//! - Request classification with per-resource-type strategies
//! - Versioned static/API cache partitions with optional disk persistence
//! - Install/activate lifecycle with all-or-nothing precaching
//! - Push notification decoding and display routing
//! - Deferred background synchronization of offline work
//! - Connectivity and installability monitoring for the UI layer

pub mod builder;
pub mod cache;
pub mod clients;
pub mod config;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod fetcher;
pub mod lifecycle;
pub mod monitor;
pub mod push;
pub mod response;
pub mod strategy;
pub mod sync;

#[cfg(test)]
mod testutil;

pub use builder::WorkerConfigBuilder;
pub use config::WorkerConfig;
pub use controller::WorkerController;
pub use error::OfflineError;

// Re-export the request/response value types
pub use fetch::{Destination, FetchRequest};
pub use response::{OFFLINE_BODY, ResponseSnapshot};

// Re-export the cache layer
pub use cache::{CacheKey, CachePartition, CacheStore};

// Re-export the host adapter seams
pub use clients::{ClientRegistry, ClientWindow};
pub use fetcher::{Fetcher, HttpFetcher, create_client};
pub use push::{NotificationDisplay, NotificationSink, PushData, PushPayload};
pub use sync::{PendingUpload, QueueBackend, SyncBackend, SyncQueue, UploadKind};

// Re-export lifecycle and monitor types
pub use lifecycle::{LifecycleManager, WorkerMessage, WorkerReply, WorkerState};
pub use monitor::{
    AppMonitor, Connectivity, InstallPrompt, InstallState, PromptOutcome, PushPlatform,
    PushSubscription,
};

// Re-export classification types
pub use strategy::{PartitionKind, Route, StrategyKind, classify};
