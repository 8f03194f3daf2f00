use reqwest::StatusCode;

// Custom error type for offline engine operations
#[derive(Debug, thiserror::Error)]
pub enum OfflineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(String),

    #[error("Server returned status code {0}")]
    Status(StatusCode),

    #[error("Network unreachable: {0}")]
    Unreachable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Install failed while precaching {url}: {reason}")]
    InstallFailed { url: String, reason: String },

    #[error("Invalid worker state: expected {expected}, got {actual}")]
    InvalidState {
        expected: &'static str,
        actual: crate::lifecycle::WorkerState,
    },

    #[error("No captured install prompt")]
    NoInstallPrompt,

    #[error("Malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Sync failed: {0}")]
    Sync(String),

    #[error("Notification error: {0}")]
    Notification(String),
}
