//! # Builder for WorkerConfig
//!
//! This module provides a builder pattern implementation for creating and
//! customizing WorkerConfig instances with a fluent API.
//!
//! # Example
//!
//! ```
//! use nexo_offline::WorkerConfig;
//!
//! let config = WorkerConfig::builder()
//!     .with_version("v3")
//!     .with_origin("https://campus.example.edu")
//!     .with_static_manifest(["/", "/manifest.json"])
//!     .with_offline_document("/offline.html")
//!     .build();
//!
//! assert_eq!(config.static_partition_name(), "nexo-static-v3");
//! ```

use std::path::PathBuf;
use std::time::Duration;

use crate::WorkerConfig;

/// Builder for creating WorkerConfig instances with a fluent API
#[derive(Debug, Clone)]
pub struct WorkerConfigBuilder {
    /// Internal config being built
    config: WorkerConfig,
}

impl WorkerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: WorkerConfig::default(),
        }
    }

    /// Set the application name used as the default notification title
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.config.app_name = app_name.into();
        self
    }

    /// Set the origin the application is served from
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.config.origin = origin.into();
        self
    }

    /// Set the prefix shared by both cache partition names
    pub fn with_cache_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.cache_prefix = prefix.into();
        self
    }

    /// Set the version tag embedded in partition names
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.config.version = version.into();
        self
    }

    /// Replace the static precache manifest
    pub fn with_static_manifest<I, S>(mut self, manifest: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.static_manifest = manifest.into_iter().map(Into::into).collect();
        self
    }

    /// Append a single asset to the static precache manifest
    pub fn with_manifest_asset(mut self, path: impl Into<String>) -> Self {
        self.config.static_manifest.push(path.into());
        self
    }

    /// Set the offline fallback document path
    pub fn with_offline_document(mut self, path: impl Into<String>) -> Self {
        self.config.offline_document = path.into();
        self
    }

    /// Set the path prefix routed to the API partition
    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.api_prefix = prefix.into();
        self
    }

    /// Set the background-sync tag addressed to this engine
    pub fn with_sync_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.sync_tag = tag.into();
        self
    }

    /// Set the window URL opened for notifications without one
    pub fn with_default_notification_url(mut self, url: impl Into<String>) -> Self {
        self.config.default_notification_url = url.into();
        self
    }

    /// Enable the persistent cache layer rooted at the given directory
    pub fn with_disk_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.disk_root = Some(root.into());
        self
    }

    /// Set the overall timeout for a network fetch
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the user agent string for outgoing fetches
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the WorkerConfig instance
    pub fn build(self) -> WorkerConfig {
        self.config
    }
}

impl Default for WorkerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
