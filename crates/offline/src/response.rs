//! # Response Snapshots
//!
//! A [`ResponseSnapshot`] is an HTTP-shaped value frozen at write time:
//! status, headers and body. Cached entries, live network responses and the
//! synthetic offline fallback are all expressed as snapshots so strategies
//! can be compared and tested by equality.

use bytes::Bytes;

/// Body of the unified synthetic offline response.
pub const OFFLINE_BODY: &str = "Sin conexión: contenido no disponible";

/// A frozen HTTP-shaped response: status, headers and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSnapshot {
    /// HTTP status code
    pub status: u16,
    /// Status text accompanying the code
    pub status_text: String,
    /// Response headers as name/value pairs
    pub headers: Vec<(String, String)>,
    /// Response body bytes
    pub body: Bytes,
}

impl ResponseSnapshot {
    /// Create a new snapshot with the given status and body
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Create a 200 OK snapshot with the given body
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(200, "OK", body)
    }

    /// The unified synthetic failure returned when neither the network nor
    /// the cache can satisfy a request.
    pub fn offline() -> Self {
        Self::new(408, "Request Timeout", OFFLINE_BODY)
            .with_header("Content-Type", "text/plain; charset=utf-8")
    }

    /// Attach a header to this snapshot
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Look up a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Size of the body in bytes
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Whether the body is empty
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
