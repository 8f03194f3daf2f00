//! # Worker Controller
//!
//! The offline engine's event surface: one method per lifecycle event
//! instead of callback registration, so the host runtime's event loop is
//! the only environment-specific piece. The controller owns the cache
//! store, the transport and the host-service adapters, and tracks every
//! detached task (revalidations, notification display) so nothing is torn
//! down before its cache write or display completes.

use std::sync::Arc;

use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::clients::{ClientRegistry, same_origin};
use crate::config::WorkerConfig;
use crate::error::OfflineError;
use crate::fetch::FetchRequest;
use crate::fetcher::Fetcher;
use crate::lifecycle::{LifecycleManager, WorkerMessage, WorkerReply, WorkerState};
use crate::push::{ACTION_DISMISS, NotificationDisplay, NotificationSink, PushData, PushPayload};
use crate::response::ResponseSnapshot;
use crate::strategy::{self, DocumentFallback, PartitionKind, Route, StrategyKind};
use crate::sync::SyncBackend;

pub struct WorkerController {
    config: WorkerConfig,
    store: CacheStore,
    fetcher: Arc<dyn Fetcher>,
    clients: Arc<dyn ClientRegistry>,
    notifications: Arc<dyn NotificationSink>,
    sync_backend: Arc<dyn SyncBackend>,
    lifecycle: LifecycleManager,
    tracker: TaskTracker,
}

impl WorkerController {
    pub fn new(
        config: WorkerConfig,
        fetcher: Arc<dyn Fetcher>,
        clients: Arc<dyn ClientRegistry>,
        notifications: Arc<dyn NotificationSink>,
        sync_backend: Arc<dyn SyncBackend>,
    ) -> Self {
        let store = CacheStore::new(config.disk_root.clone());
        Self {
            config,
            store,
            fetcher,
            clients,
            notifications,
            sync_backend,
            lifecycle: LifecycleManager::new(),
            tracker: TaskTracker::new(),
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn state(&self) -> WorkerState {
        self.lifecycle.state()
    }

    /// Direct access to the cache store, mainly for inspection in tests
    /// and host tooling
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Install: precache the static manifest and open the API partition
    pub async fn on_install(&self) -> Result<(), OfflineError> {
        self.lifecycle
            .install(&self.config, &self.store, self.fetcher.as_ref())
            .await
    }

    /// Activate: evict superseded partitions and claim the clients.
    /// Returns the names of the deleted partitions.
    pub async fn on_activate(&self) -> Result<Vec<String>, OfflineError> {
        self.lifecycle
            .activate(&self.config, &self.store, self.clients.as_ref())
            .await
    }

    /// Resolve an intercepted request.
    ///
    /// Returns `None` when the request is not intercepted (non-HTTP
    /// scheme) and the host should let it pass through untouched. An `Err`
    /// only arises from a stale-while-revalidate miss whose network fetch
    /// failed, which surfaces as an unresolved fetch to the page.
    pub async fn on_fetch(
        &self,
        request: &FetchRequest,
    ) -> Result<Option<ResponseSnapshot>, OfflineError> {
        let route = strategy::classify(request, &self.config.api_prefix);
        let Route::Handle {
            strategy: kind,
            partition,
        } = route
        else {
            return Ok(None);
        };

        let partition_name = match partition {
            PartitionKind::Static => self.config.static_partition_name(),
            PartitionKind::Api => self.config.api_partition_name(),
        };
        let partition = self.store.open(&partition_name);

        let response = match kind {
            StrategyKind::CacheFirst => {
                strategy::cache_first(request, &partition, self.fetcher.as_ref()).await
            }
            StrategyKind::NetworkFirst => {
                let static_partition = self.store.open(&self.config.static_partition_name());
                let offline_url = self.config.offline_document_url();
                strategy::network_first(
                    request,
                    &partition,
                    self.fetcher.as_ref(),
                    Some(DocumentFallback {
                        partition: &static_partition,
                        offline_url: &offline_url,
                    }),
                )
                .await
            }
            StrategyKind::StaleWhileRevalidate => {
                strategy::stale_while_revalidate(request, &partition, &self.fetcher, &self.tracker)
                    .await?
            }
        };

        Ok(Some(response))
    }

    /// Push event: decode the payload and show a notification.
    ///
    /// Absent or malformed payloads are a no-op. The display runs as a
    /// tracked task so the event's extended lifetime covers it.
    pub async fn on_push(&self, payload: Option<&[u8]>) {
        let Some(bytes) = payload else {
            debug!("Push event without payload, ignoring");
            return;
        };

        let payload = match PushPayload::parse(bytes) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Malformed push payload, ignoring");
                return;
            }
        };

        let display = NotificationDisplay::from_payload(payload, &self.config.app_name);
        let notifications = Arc::clone(&self.notifications);
        self.tracker.spawn(async move {
            if let Err(e) = notifications.show(display).await {
                warn!(error = %e, "Failed to display notification");
            }
        });
    }

    /// Notification click: close, then route "view" to an existing
    /// same-origin window or open a new one at the notification's URL.
    pub async fn on_notification_click(&self, action: &str, tag: &str, data: &PushData) {
        self.notifications.close(tag).await;

        if action == ACTION_DISMISS {
            return;
        }

        for window in self.clients.list().await {
            if same_origin(&window.url, &self.config.origin) {
                if self.clients.focus(&window.id).await {
                    debug!(window = %window.id, "Focused existing application window");
                    return;
                }
            }
        }

        let url = data
            .url
            .clone()
            .unwrap_or_else(|| self.config.default_notification_url.clone());
        self.clients.open(&url).await;
    }

    /// Sync event: run the pending-synchronization routine when the tag is
    /// ours; its failure propagates so the host runtime retries.
    pub async fn on_sync(&self, tag: &str) -> Result<(), OfflineError> {
        if tag != self.config.sync_tag {
            debug!(tag, "Ignoring sync event with foreign tag");
            return Ok(());
        }

        info!(tag, "Running pending synchronization");
        self.sync_backend.flush_pending().await
    }

    /// Control message from the host page
    pub fn on_message(&self, message: WorkerMessage) -> Option<WorkerReply> {
        match message {
            WorkerMessage::SkipWaiting => {
                self.lifecycle.request_skip_waiting();
                None
            }
            WorkerMessage::GetVersion => Some(WorkerReply::Version {
                version: self.config.version.clone(),
            }),
        }
    }

    /// Surface an update-available signal once a new version has installed
    /// while an old one is still active: a local notification when
    /// permitted, otherwise an observable log line for the host UI.
    pub async fn notify_update_available(&self) {
        if !self.notifications.permission_granted() {
            info!("Update available; notification permission not granted");
            return;
        }

        let display = NotificationDisplay::from_payload(
            PushPayload {
                title: Some(self.config.app_name.clone()),
                message: Some("Nueva versión disponible".to_string()),
                tag: Some("update".to_string()),
                data: None,
            },
            &self.config.app_name,
        );

        let notifications = Arc::clone(&self.notifications);
        self.tracker.spawn(async move {
            if let Err(e) = notifications.show(display).await {
                warn!(error = %e, "Failed to display update notification");
            }
        });
    }

    /// Wait for every tracked detached task (revalidations, notification
    /// displays) to finish. No further events may be handled afterwards.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}
