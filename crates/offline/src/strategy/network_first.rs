//! # Network-First Strategy
//!
//! Prefer the live network; a successful response is cloned into the cache
//! before it is returned. Only after a network failure is the cache
//! consulted, then the designated offline document for navigations, then
//! the synthetic offline response. Never raises past this boundary.

use tracing::{debug, warn};

use crate::cache::{CacheKey, CachePartition};
use crate::fetch::{Destination, FetchRequest};
use crate::fetcher::Fetcher;
use crate::response::ResponseSnapshot;

/// Where to find the offline fallback document for failed navigations
pub struct DocumentFallback<'a> {
    /// Partition the offline document was precached into
    pub partition: &'a CachePartition,
    /// Full URL the offline document was cached under
    pub offline_url: &'a str,
}

pub async fn resolve(
    request: &FetchRequest,
    partition: &CachePartition,
    fetcher: &dyn Fetcher,
    fallback: Option<DocumentFallback<'_>>,
) -> ResponseSnapshot {
    let key = CacheKey::from_request(request);

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
            debug!(url = %request.url, error = %e, "Network unreachable, falling back to cache");

            if let Some(cached) = partition.lookup(&key).await {
                return cached;
            }

            if request.destination == Destination::Document {
                if let Some(fallback) = fallback {
                    let offline_key = CacheKey::new("GET", fallback.offline_url);
                    if let Some(page) = fallback.partition.lookup(&offline_key).await {
                        debug!(url = %request.url, "Serving offline document for failed navigation");
                        return page;
                    }
                }
            }

            ResponseSnapshot::offline()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockFetcher;

    const API_URL: &str = "https://nexo.app/api/posts";
    const OFFLINE_URL: &str = "https://nexo.app/offline.html";

    fn api_request() -> FetchRequest {
        FetchRequest::get(API_URL, Destination::Empty)
    }

    #[tokio::test]
    async fn test_network_is_preferred_over_cache() {
        let partition = CachePartition::new("nexo-api-v1", None);
        let fetcher = MockFetcher::new();
        let key = CacheKey::from_request(&api_request());
        partition.put(key.clone(), ResponseSnapshot::ok("stale")).await.unwrap();
        fetcher.respond(API_URL, ResponseSnapshot::ok("live"));

        let resolved = resolve(&api_request(), &partition, &fetcher, None).await;

        assert_eq!(resolved.body, bytes::Bytes::from("live"));
        assert_eq!(fetcher.call_count(API_URL), 1);
        // The cache now holds the live response.
        assert_eq!(partition.lookup(&key).await.unwrap().body, bytes::Bytes::from("live"));
    }

    #[tokio::test]
    async fn test_error_status_is_returned_live_but_not_cached() {
        let partition = CachePartition::new("nexo-api-v1", None);
        let fetcher = MockFetcher::new();
        fetcher.respond(API_URL, ResponseSnapshot::new(500, "Internal Server Error", ""));

        let resolved = resolve(&api_request(), &partition, &fetcher, None).await;

        assert_eq!(resolved.status, 500);
        assert!(partition.is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_falls_back_to_cache() {
        let partition = CachePartition::new("nexo-api-v1", None);
        let fetcher = MockFetcher::new();
        let cached = ResponseSnapshot::ok("{\"posts\":[]}");
        partition
            .put(CacheKey::from_request(&api_request()), cached.clone())
            .await
            .unwrap();
        fetcher.fail(API_URL);

        let resolved = resolve(&api_request(), &partition, &fetcher, None).await;

        assert_eq!(resolved, cached);
    }

    #[tokio::test]
    async fn test_failure_without_cache_yields_offline_response() {
        let partition = CachePartition::new("nexo-api-v1", None);
        let fetcher = MockFetcher::new();
        fetcher.fail(API_URL);

        let resolved = resolve(&api_request(), &partition, &fetcher, None).await;

        assert_eq!(resolved.status, 408);
        assert_eq!(resolved, ResponseSnapshot::offline());
    }

    #[tokio::test]
    async fn test_failed_navigation_serves_offline_document() {
        let api_partition = CachePartition::new("nexo-api-v1", None);
        let static_partition = CachePartition::new("nexo-static-v1", None);
        let fetcher = MockFetcher::new();

        let offline_page = ResponseSnapshot::ok("<h1>Sin conexión</h1>");
        static_partition
            .put(CacheKey::new("GET", OFFLINE_URL), offline_page.clone())
            .await
            .unwrap();

        let request = FetchRequest::get("https://nexo.app/posts/42", Destination::Document);
        fetcher.fail(&request.url);

        let resolved = resolve(
            &request,
            &api_partition,
            &fetcher,
            Some(DocumentFallback {
                partition: &static_partition,
                offline_url: OFFLINE_URL,
            }),
        )
        .await;

        assert_eq!(resolved, offline_page);
    }

    #[tokio::test]
    async fn test_non_document_failure_skips_offline_document() {
        let partition = CachePartition::new("nexo-api-v1", None);
        let static_partition = CachePartition::new("nexo-static-v1", None);
        let fetcher = MockFetcher::new();

        static_partition
            .put(CacheKey::new("GET", OFFLINE_URL), ResponseSnapshot::ok("offline"))
            .await
            .unwrap();
        fetcher.fail(API_URL);

        let resolved = resolve(
            &api_request(),
            &partition,
            &fetcher,
            Some(DocumentFallback {
                partition: &static_partition,
                offline_url: OFFLINE_URL,
            }),
        )
        .await;

        assert_eq!(resolved, ResponseSnapshot::offline());
    }
}
