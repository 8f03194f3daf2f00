//! # Worker Configuration
//!
//! Explicit configuration for the offline engine: partition names, version
//! tag, static precache manifest and fallback/offline routing. There is no
//! global worker state; every controller instance is constructed from a
//! [`WorkerConfig`], which keeps multiple instances independent in tests.

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "nexo-offline/0.1";

/// Configurable options for the offline engine
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Application name, used as the default notification title
    pub app_name: String,

    /// Origin the application is served from, used to absolutize manifest
    /// paths and to match client windows on notification clicks
    pub origin: String,

    /// Prefix shared by both cache partition names
    pub cache_prefix: String,

    /// Version tag embedded in partition names; bumping it is the sole
    /// mechanism for invalidating stale entries on activation
    pub version: String,

    /// Critical assets precached into the static partition on install
    pub static_manifest: Vec<String>,

    /// Document served for failed navigations when the cache has no entry
    pub offline_document: String,

    /// Path prefix routed to the API partition with the network-first strategy
    pub api_prefix: String,

    /// Tag identifying deferred-synchronization events addressed to us
    pub sync_tag: String,

    /// Window URL opened when a clicked notification carries no URL
    pub default_notification_url: String,

    /// Root directory for the persistent cache layer; `None` keeps all
    /// partitions in memory only
    pub disk_root: Option<PathBuf>,

    /// Overall timeout for a network fetch
    pub request_timeout: Duration,

    /// Connection timeout (time to establish initial connection)
    pub connect_timeout: Duration,

    /// User agent string for outgoing fetches
    pub user_agent: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            app_name: "Nexo".to_string(),
            origin: "https://nexo.app".to_string(),
            cache_prefix: "nexo".to_string(),
            version: "v1".to_string(),
            static_manifest: vec![
                "/".to_string(),
                "/index.html".to_string(),
                "/manifest.json".to_string(),
                "/offline.html".to_string(),
                "/favicon.ico".to_string(),
            ],
            offline_document: "/offline.html".to_string(),
            api_prefix: "/api/".to_string(),
            sync_tag: "nexo-sync".to_string(),
            default_notification_url: "/".to_string(),
            disk_root: None,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl WorkerConfig {
    pub fn builder() -> crate::builder::WorkerConfigBuilder {
        crate::builder::WorkerConfigBuilder::new()
    }

    /// Name of the static-asset partition for the configured version
    pub fn static_partition_name(&self) -> String {
        format!("{}-static-{}", self.cache_prefix, self.version)
    }

    /// Name of the API-response partition for the configured version
    pub fn api_partition_name(&self) -> String {
        format!("{}-api-{}", self.cache_prefix, self.version)
    }

    /// Resolve a manifest path against the configured origin.
    ///
    /// Absolute URLs are passed through untouched.
    pub fn asset_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.origin.trim_end_matches('/'), path)
        }
    }

    /// Full URL of the offline fallback document
    pub fn offline_document_url(&self) -> String {
        self.asset_url(&self.offline_document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_names_embed_prefix_and_version() {
        let config = WorkerConfig {
            cache_prefix: "campus".to_string(),
            version: "v7".to_string(),
            ..WorkerConfig::default()
        };
        assert_eq!(config.static_partition_name(), "campus-static-v7");
        assert_eq!(config.api_partition_name(), "campus-api-v7");
    }

    #[test]
    fn asset_url_absolutizes_paths() {
        let config = WorkerConfig::default();
        assert_eq!(config.asset_url("/manifest.json"), "https://nexo.app/manifest.json");
        assert_eq!(
            config.asset_url("https://cdn.nexo.app/logo.png"),
            "https://cdn.nexo.app/logo.png"
        );
    }

    #[test]
    fn trailing_slash_on_origin_is_tolerated() {
        let config = WorkerConfig {
            origin: "https://nexo.app/".to_string(),
            ..WorkerConfig::default()
        };
        assert_eq!(config.asset_url("/offline.html"), "https://nexo.app/offline.html");
    }
}
