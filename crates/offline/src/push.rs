//! # Push Notifications
//!
//! Decoding of push payloads into displayable notifications. A payload
//! arrives as opaque bytes, is transformed once into a
//! [`NotificationDisplay`], shown through the host's [`NotificationSink`]
//! and then discarded; the engine persists nothing. Absent or malformed
//! payloads are a no-op, never a crash.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::OfflineError;

/// Action identifier for opening/focusing the application
pub const ACTION_VIEW: &str = "view";
/// Action identifier for dismissing the notification
pub const ACTION_DISMISS: &str = "dismiss";

const DEFAULT_BODY: &str = "Nueva notificación";
const DEFAULT_TAG: &str = "default";

/// Externally supplied push payload; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushPayload {
    pub title: Option<String>,
    pub message: Option<String>,
    pub tag: Option<String>,
    pub data: Option<PushData>,
}

impl PushPayload {
    /// Decode a payload from raw push-event bytes
    pub fn parse(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Application data attached to a push payload and carried through to the
/// displayed notification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushData {
    /// Window URL to open when the notification is viewed
    pub url: Option<String>,
    /// Any additional fields the application attached
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A notification action button
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

/// A displayable notification derived from a push payload
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDisplay {
    pub title: String,
    pub body: String,
    pub tag: String,
    pub data: PushData,
    pub require_interaction: bool,
    pub actions: Vec<NotificationAction>,
}

impl NotificationDisplay {
    /// Build a notification from a payload, applying the documented
    /// defaults for every absent field.
    pub fn from_payload(payload: PushPayload, app_name: &str) -> Self {
        Self {
            title: payload.title.unwrap_or_else(|| app_name.to_string()),
            body: payload.message.unwrap_or_else(|| DEFAULT_BODY.to_string()),
            tag: payload.tag.unwrap_or_else(|| DEFAULT_TAG.to_string()),
            data: payload.data.unwrap_or_default(),
            require_interaction: true,
            actions: vec![
                NotificationAction {
                    action: ACTION_VIEW.to_string(),
                    title: "Ver".to_string(),
                },
                NotificationAction {
                    action: ACTION_DISMISS.to_string(),
                    title: "Cerrar".to_string(),
                },
            ],
        }
    }
}

/// Host-side notification display surface
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Display a notification
    async fn show(&self, notification: NotificationDisplay) -> Result<(), OfflineError>;

    /// Close any displayed notification with the given tag
    async fn close(&self, tag: &str);

    /// Whether the user has granted notification permission
    fn permission_granted(&self) -> bool;
}
