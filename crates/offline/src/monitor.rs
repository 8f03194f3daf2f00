//! # Connectivity & Installability Monitor
//!
//! Passive observer the UI queries for online status and install prompts.
//! It is not part of the request path: it seeds its state synchronously
//! from the platform at construction, then tracks transition events the
//! host forwards to it. The captured install prompt is single-use
//! regardless of the user's choice.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::error::OfflineError;
use crate::lifecycle::WorkerMessage;

/// Installability state of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    /// The platform has not offered an install prompt
    NotInstallable,
    /// An install prompt has been captured and can be shown
    Installable,
    /// The application is installed; terminal
    Installed,
}

/// Transport-level connectivity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Online,
    Offline,
}

/// Outcome of showing an install prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOutcome {
    Accepted,
    Dismissed,
}

/// A captured, single-use install prompt
#[async_trait]
pub trait InstallPrompt: Send + Sync {
    /// Show the prompt and await the user's choice
    async fn show(&self) -> Result<PromptOutcome, OfflineError>;
}

/// A push subscription handed back to the application for registration
/// with its notification service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushSubscription {
    pub endpoint: String,
    pub auth: String,
    pub p256dh: String,
}

/// Platform adapter the monitor reads initial state from and delegates
/// permission/subscription requests to
#[async_trait]
pub trait PushPlatform: Send + Sync {
    /// Current transport status, read synchronously at monitor startup
    fn is_online(&self) -> bool;

    /// Whether the application is already running standalone (installed)
    fn is_standalone(&self) -> bool;

    /// Ask the user for notification permission; returns whether granted
    async fn request_notification_permission(&self) -> Result<bool, OfflineError>;

    /// Subscribe to push messages
    async fn subscribe_to_push(&self) -> Result<PushSubscription, OfflineError>;
}

/// Connectivity and installability monitor consumed by the UI layer
pub struct AppMonitor {
    platform: Arc<dyn PushPlatform>,
    install_state: Mutex<InstallState>,
    connectivity: Mutex<Connectivity>,
    prompt: Mutex<Option<Box<dyn InstallPrompt>>>,
    update_tx: mpsc::UnboundedSender<WorkerMessage>,
}

impl AppMonitor {
    /// Create a monitor, seeding state from the platform.
    ///
    /// The returned receiver carries control messages (skip-waiting) for
    /// the worker side of the update handshake.
    pub fn new(
        platform: Arc<dyn PushPlatform>,
    ) -> (Self, mpsc::UnboundedReceiver<WorkerMessage>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        let install_state = if platform.is_standalone() {
            InstallState::Installed
        } else {
            InstallState::NotInstallable
        };
        let connectivity = if platform.is_online() {
            Connectivity::Online
        } else {
            Connectivity::Offline
        };

        let monitor = Self {
            platform,
            install_state: Mutex::new(install_state),
            connectivity: Mutex::new(connectivity),
            prompt: Mutex::new(None),
            update_tx,
        };
        (monitor, update_rx)
    }

    /// Whether an install prompt is currently available
    pub fn is_installable(&self) -> bool {
        *self.install_state.lock() == InstallState::Installable
    }

    /// Whether the application is installed
    pub fn is_installed(&self) -> bool {
        *self.install_state.lock() == InstallState::Installed
    }

    /// Current connectivity as last observed
    pub fn is_online(&self) -> bool {
        *self.connectivity.lock() == Connectivity::Online
    }

    /// Record a transport online transition
    pub fn handle_online(&self) {
        *self.connectivity.lock() = Connectivity::Online;
        debug!("Connectivity: online");
    }

    /// Record a transport offline transition
    pub fn handle_offline(&self) {
        *self.connectivity.lock() = Connectivity::Offline;
        debug!("Connectivity: offline");
    }

    /// Capture a platform install prompt for later use
    pub fn capture_install_prompt(&self, prompt: Box<dyn InstallPrompt>) {
        let mut state = self.install_state.lock();
        if *state == InstallState::Installed {
            return;
        }
        *self.prompt.lock() = Some(prompt);
        *state = InstallState::Installable;
        debug!("Install prompt captured");
    }

    /// Record that the platform reported the app as installed
    pub fn handle_installed(&self) {
        *self.install_state.lock() = InstallState::Installed;
        *self.prompt.lock() = None;
        info!("Application installed");
    }

    /// Show the captured install prompt and await the user's choice.
    ///
    /// The prompt is consumed whatever the outcome. Returns whether the
    /// user accepted.
    pub async fn install_app(&self) -> Result<bool, OfflineError> {
        let prompt = self.prompt.lock().take().ok_or(OfflineError::NoInstallPrompt)?;

        let outcome = prompt.show().await?;
        match outcome {
            PromptOutcome::Accepted => {
                self.handle_installed();
                Ok(true)
            }
            PromptOutcome::Dismissed => {
                *self.install_state.lock() = InstallState::NotInstallable;
                Ok(false)
            }
        }
    }

    /// Ask the waiting worker to activate immediately. The host reloads
    /// once the new version has taken over.
    pub fn update_app(&self) {
        // Send failure only means no worker side is listening; nothing to
        // surface to the UI either way.
        let _ = self.update_tx.send(WorkerMessage::SkipWaiting);
        info!("Update requested, skip-waiting sent to worker");
    }

    /// Ask the user for notification permission
    pub async fn request_notification_permission(&self) -> Result<bool, OfflineError> {
        self.platform.request_notification_permission().await
    }

    /// Subscribe to push messages
    pub async fn subscribe_to_push(&self) -> Result<PushSubscription, OfflineError> {
        self.platform.subscribe_to_push().await
    }
}
