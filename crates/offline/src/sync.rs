//! # Background Sync
//!
//! Deferred synchronization of work queued while offline. The engine only
//! dispatches: when a sync event carries our tag, the backend's flush runs
//! and its outcome propagates to the host runtime, whose retry policy
//! re-schedules failed syncs. Failures are never swallowed here.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::OfflineError;
use crate::fetch::FetchRequest;
use crate::fetcher::Fetcher;

/// Kind of content waiting to be uploaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadKind {
    Post,
    Comment,
    File,
}

/// A unit of work queued while offline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingUpload {
    pub kind: UploadKind,
    /// API endpoint the payload is posted to
    pub endpoint: String,
    pub payload: serde_json::Value,
}

/// Executes the pending-synchronization routine when connectivity returns
#[async_trait]
pub trait SyncBackend: Send + Sync {
    /// Upload everything queued. An `Err` must propagate to the caller so
    /// the host runtime engages its retry mechanism.
    async fn flush_pending(&self) -> Result<(), OfflineError>;
}

/// FIFO of uploads the application deferred while offline
#[derive(Default)]
pub struct SyncQueue {
    items: Mutex<VecDeque<PendingUpload>>,
}

impl SyncQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an upload to the back of the queue
    pub fn enqueue(&self, upload: PendingUpload) {
        self.items.lock().push_back(upload);
    }

    /// Number of queued uploads
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    fn pop(&self) -> Option<PendingUpload> {
        self.items.lock().pop_front()
    }

    fn requeue_front(&self, upload: PendingUpload) {
        self.items.lock().push_front(upload);
    }
}

/// [`SyncBackend`] draining a [`SyncQueue`] through the network fetcher.
///
/// Uploads run in queue order and stop at the first failure; the failed
/// item and everything behind it stay queued for the next sync attempt.
pub struct QueueBackend {
    queue: Arc<SyncQueue>,
    fetcher: Arc<dyn Fetcher>,
}

impl QueueBackend {
    pub fn new(queue: Arc<SyncQueue>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { queue, fetcher }
    }
}

#[async_trait]
impl SyncBackend for QueueBackend {
    async fn flush_pending(&self) -> Result<(), OfflineError> {
        while let Some(upload) = self.queue.pop() {
            let body = serde_json::to_vec(&upload.payload)?;
            let request = FetchRequest::post(upload.endpoint.clone(), Bytes::from(body));

            match self.fetcher.fetch(&request).await {
                Ok(response) if response.is_success() => {
                    info!(kind = ?upload.kind, endpoint = %upload.endpoint, "Uploaded pending item");
                }
                Ok(response) => {
                    warn!(
                        kind = ?upload.kind,
                        endpoint = %upload.endpoint,
                        status = response.status,
                        "Upload rejected, keeping item queued"
                    );
                    self.queue.requeue_front(upload);
                    return Err(OfflineError::Sync(format!(
                        "upload rejected with status {}",
                        response.status
                    )));
                }
                Err(e) => {
                    warn!(kind = ?upload.kind, endpoint = %upload.endpoint, error = %e, "Upload failed, keeping item queued");
                    self.queue.requeue_front(upload);
                    return Err(e);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ResponseSnapshot;
    use crate::testutil::MockFetcher;

    fn upload(endpoint: &str) -> PendingUpload {
        PendingUpload {
            kind: UploadKind::Comment,
            endpoint: endpoint.to_string(),
            payload: serde_json::json!({"body": "hola"}),
        }
    }

    #[tokio::test]
    async fn test_flush_drains_queue_in_order() {
        let queue = Arc::new(SyncQueue::new());
        queue.enqueue(upload("https://nexo.app/api/comments"));
        queue.enqueue(upload("https://nexo.app/api/posts"));

        let mock = Arc::new(MockFetcher::new());
        mock.respond("https://nexo.app/api/comments", ResponseSnapshot::new(201, "Created", ""));
        mock.respond("https://nexo.app/api/posts", ResponseSnapshot::new(201, "Created", ""));

        let backend = QueueBackend::new(Arc::clone(&queue), Arc::clone(&mock) as Arc<dyn Fetcher>);
        backend.flush_pending().await.unwrap();

        assert!(queue.is_empty());
        assert_eq!(
            mock.calls(),
            vec!["https://nexo.app/api/comments", "https://nexo.app/api/posts"]
        );
    }

    #[tokio::test]
    async fn test_flush_stops_at_first_failure_and_requeues() {
        let queue = Arc::new(SyncQueue::new());
        queue.enqueue(upload("https://nexo.app/api/comments"));
        queue.enqueue(upload("https://nexo.app/api/posts"));

        let mock = Arc::new(MockFetcher::new());
        mock.fail("https://nexo.app/api/comments");

        let backend = QueueBackend::new(Arc::clone(&queue), Arc::clone(&mock) as Arc<dyn Fetcher>);
        let result = backend.flush_pending().await;

        assert!(result.is_err(), "failure must propagate for host retry");
        assert_eq!(queue.len(), 2, "failed item and the rest stay queued");
        assert_eq!(mock.call_count("https://nexo.app/api/posts"), 0);
    }

    #[tokio::test]
    async fn test_rejected_upload_propagates_as_sync_error() {
        let queue = Arc::new(SyncQueue::new());
        queue.enqueue(upload("https://nexo.app/api/comments"));

        let mock = Arc::new(MockFetcher::new());
        mock.respond(
            "https://nexo.app/api/comments",
            ResponseSnapshot::new(422, "Unprocessable Entity", ""),
        );

        let backend = QueueBackend::new(Arc::clone(&queue), Arc::clone(&mock) as Arc<dyn Fetcher>);
        let result = backend.flush_pending().await;

        assert!(matches!(result, Err(OfflineError::Sync(_))));
        assert_eq!(queue.len(), 1);
    }
}
