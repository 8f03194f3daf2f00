//! # Client Registry
//!
//! Thin adapter over the environment-specific window registry. The engine
//! only needs to enumerate open application windows, focus one, open a new
//! one, and claim all of them after activation; everything else stays on
//! the host side.

use async_trait::async_trait;
use url::Url;

/// An open application window under the engine's scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientWindow {
    /// Host-assigned identifier
    pub id: String,
    /// URL the window is currently showing
    pub url: String,
}

impl ClientWindow {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}

/// Whether two URLs share scheme, host and port
pub fn same_origin(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(a), Ok(b)) => a.origin() == b.origin(),
        _ => false,
    }
}

/// Host-side registry of open application windows
#[async_trait]
pub trait ClientRegistry: Send + Sync {
    /// Enumerate open windows
    async fn list(&self) -> Vec<ClientWindow>;

    /// Claim all open windows so the newly activated version handles their
    /// subsequent requests without a reload
    async fn claim(&self);

    /// Focus the window with the given id; returns whether it succeeded
    async fn focus(&self, id: &str) -> bool;

    /// Open a new window at the given URL
    async fn open(&self, url: &str);
}
