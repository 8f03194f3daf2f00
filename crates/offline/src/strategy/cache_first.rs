//! # Cache-First Strategy
//!
//! Serve the cached snapshot when one exists; otherwise fetch from the
//! network, storing a clone of successful responses before returning them.
//! Never raises past this boundary: with no cache entry and no network the
//! caller gets the synthetic offline response.

use tracing::{debug, warn};

use crate::cache::{CacheKey, CachePartition};
use crate::fetch::FetchRequest;
use crate::fetcher::Fetcher;
use crate::response::ResponseSnapshot;

pub async fn resolve(
    request: &FetchRequest,
    partition: &CachePartition,
    fetcher: &dyn Fetcher,
) -> ResponseSnapshot {
    let key = CacheKey::from_request(request);

    if let Some(cached) = partition.lookup(&key).await {
        debug!(url = %request.url, partition = %partition.name(), "Cache-first hit");
        return cached;
    }

    match fetcher.fetch(request).await {
        Ok(response) => {
            if response.is_success() {
                if let Err(e) = partition.put(key, response.clone()).await {
                    warn!(url = %request.url, error = %e, "Failed to store fetched response");
                }
            }
            response
        }
        Err(e) => {
            warn!(url = %request.url, error = %e, "Cache-first miss and network unreachable");
            ResponseSnapshot::offline()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::Destination;
    use crate::testutil::MockFetcher;

    const URL: &str = "https://nexo.app/avatars/7.png";

    fn image_request() -> FetchRequest {
        FetchRequest::get(URL, Destination::Image)
    }

    #[tokio::test]
    async fn test_cached_entry_short_circuits_network() {
        let partition = CachePartition::new("nexo-static-v1", None);
        let fetcher = MockFetcher::new();
        let cached = ResponseSnapshot::ok("cached-png");
        partition
            .put(CacheKey::from_request(&image_request()), cached.clone())
            .await
            .unwrap();

        let resolved = resolve(&image_request(), &partition, &fetcher).await;

        assert_eq!(resolved, cached);
        assert_eq!(fetcher.call_count(URL), 0, "no network call on cache hit");
    }

    #[tokio::test]
    async fn test_miss_fetches_and_stores_successful_response() {
        let partition = CachePartition::new("nexo-static-v1", None);
        let fetcher = MockFetcher::new();
        fetcher.respond(URL, ResponseSnapshot::ok("fresh-png"));

        let resolved = resolve(&image_request(), &partition, &fetcher).await;

        assert_eq!(resolved.body, bytes::Bytes::from("fresh-png"));
        let key = CacheKey::from_request(&image_request());
        assert_eq!(partition.lookup(&key).await, Some(resolved));
    }

    #[tokio::test]
    async fn test_miss_does_not_store_error_response() {
        let partition = CachePartition::new("nexo-static-v1", None);
        let fetcher = MockFetcher::new();
        fetcher.respond(URL, ResponseSnapshot::new(404, "Not Found", ""));

        let resolved = resolve(&image_request(), &partition, &fetcher).await;

        assert_eq!(resolved.status, 404);
        assert!(partition.is_empty());
    }

    #[tokio::test]
    async fn test_miss_and_network_failure_yields_offline_response() {
        let partition = CachePartition::new("nexo-static-v1", None);
        let fetcher = MockFetcher::new();
        fetcher.fail(URL);

        let resolved = resolve(&image_request(), &partition, &fetcher).await;

        assert_eq!(resolved, ResponseSnapshot::offline());
    }
}
