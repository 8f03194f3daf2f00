//! # Stale-While-Revalidate Strategy
//!
//! Serve the cached snapshot immediately and refresh the cache from the
//! network in a detached task. The revalidation runs on the caller's
//! [`TaskTracker`] so the hosting process is not reclaimed before the cache
//! write completes; its result is never surfaced to the original caller.
//! On a cache miss the network fetch is awaited inline and its failure
//! propagates unresolved.

use std::sync::Arc;

use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

use crate::cache::{CacheKey, CachePartition};
use crate::error::OfflineError;
use crate::fetch::FetchRequest;
use crate::fetcher::Fetcher;
use crate::response::ResponseSnapshot;

pub async fn resolve(
    request: &FetchRequest,
    partition: &Arc<CachePartition>,
    fetcher: &Arc<dyn Fetcher>,
    tracker: &TaskTracker,
) -> Result<ResponseSnapshot, OfflineError> {
    let key = CacheKey::from_request(request);

    if let Some(cached) = partition.lookup(&key).await {
        debug!(url = %request.url, "Serving stale snapshot, revalidating in background");

        let request = request.clone();
        let partition = Arc::clone(partition);
        let fetcher = Arc::clone(fetcher);
        tracker.spawn(async move {
            match fetcher.fetch(&request).await {
                Ok(response) if response.is_success() => {
                    if let Err(e) = partition.put(key, response).await {
                        warn!(url = %request.url, error = %e, "Failed to store revalidated response");
                    }
                }
                Ok(response) => {
                    debug!(url = %request.url, status = response.status, "Revalidation returned non-success, keeping cached entry");
                }
                Err(e) => {
                    debug!(url = %request.url, error = %e, "Revalidation fetch failed");
                }
            }
        });

        return Ok(cached);
    }

    // Nothing cached: the network fetch is the response.
    let response = fetcher.fetch(request).await?;
    if response.is_success() {
        if let Err(e) = partition.put(key, response.clone()).await {
            warn!(url = %request.url, error = %e, "Failed to store fetched response");
        }
    }
    Ok(response)
}
