//! # Cache Types
//!
//! Canonical request identity used to key cache entries.

use crate::fetch::FetchRequest;

/// Cache key identifying a request: method plus full URL, query included
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// HTTP method (uppercase)
    pub method: String,
    /// Full request URL
    pub url: String,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into().to_uppercase(),
            url: url.into(),
        }
    }

    /// Derive the key for a request
    pub fn from_request(request: &FetchRequest) -> Self {
        Self::new(request.method.clone(), request.url.clone())
    }

    /// Convert to a filename-safe string
    pub fn to_filename(&self) -> String {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(&self.method);
        hasher.update(":");
        hasher.update(&self.url);

        let hash = hasher.finalize();
        format!("{hash:x}")
    }
}

/// Result of a cache storage operation
pub type CacheResult<T> = std::result::Result<T, std::io::Error>;
