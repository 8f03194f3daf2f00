//! # Fetch Requests
//!
//! This module defines the request value types the engine classifies and
//! resolves. A request's cache identity is its method plus full URL, query
//! string included.

use bytes::Bytes;
use url::Url;

/// Resource-type classification of a request, used for strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Top-level or iframe navigation
    Document,
    /// Image resource
    Image,
    /// Script resource
    Script,
    /// Stylesheet resource
    Style,
    /// Font resource
    Font,
    /// No specific destination (XHR/fetch calls)
    Empty,
}

/// An intercepted outgoing request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// HTTP method (uppercase)
    pub method: String,
    /// Full request URL, query included
    pub url: String,
    /// Destination classification of the request
    pub destination: Destination,
    /// Optional request body (uploads, deferred sync posts)
    pub body: Option<Bytes>,
}

impl FetchRequest {
    /// Create a new request with the given method, URL and destination
    pub fn new(method: impl Into<String>, url: impl Into<String>, destination: Destination) -> Self {
        Self {
            method: method.into().to_uppercase(),
            url: url.into(),
            destination,
            body: None,
        }
    }

    /// Convenience constructor for a GET request
    pub fn get(url: impl Into<String>, destination: Destination) -> Self {
        Self::new("GET", url, destination)
    }

    /// Convenience constructor for a POST request carrying a body
    pub fn post(url: impl Into<String>, body: Bytes) -> Self {
        let mut request = Self::new("POST", url, Destination::Empty);
        request.body = Some(body);
        request
    }

    /// Whether the request is addressed over HTTP or HTTPS.
    ///
    /// Anything else (extension schemes, data URLs) is not network
    /// transportable and is never intercepted.
    pub fn is_http(&self) -> bool {
        match Url::parse(&self.url) {
            Ok(url) => matches!(url.scheme(), "http" | "https"),
            Err(_) => false,
        }
    }

    /// URL path component, or "/" when the URL does not parse
    pub fn path(&self) -> String {
        Url::parse(&self.url)
            .map(|u| u.path().to_string())
            .unwrap_or_else(|_| "/".to_string())
    }
}
