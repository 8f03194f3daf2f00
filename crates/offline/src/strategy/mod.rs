//! # Caching Strategies
//!
//! Request classification and the three resolution strategies. Every
//! intercepted request is classified exactly once; evaluation order is
//! fixed and first-match wins. Destination-type checks run before the API
//! path-prefix rule, which keeps document navigations under `/api/` pages
//! out of the API partition.

mod cache_first;
mod network_first;
mod stale_while_revalidate;

pub use cache_first::resolve as cache_first;
pub use network_first::{DocumentFallback, resolve as network_first};
pub use stale_while_revalidate::resolve as stale_while_revalidate;

use crate::fetch::{Destination, FetchRequest};

/// The three request-resolution strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Serve from cache when available, network only on miss
    CacheFirst,
    /// Prefer live network, fall back to cache/offline asset on failure
    NetworkFirst,
    /// Serve cached content immediately while refreshing asynchronously
    StaleWhileRevalidate,
}

/// Logical cache partition a request resolves against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionKind {
    /// Assets, documents, scripts and styles
    Static,
    /// JSON API responses
    Api,
}

/// Outcome of classifying an intercepted request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The request is not network-transportable and passes through untouched
    Ignore,
    /// Resolve with the given strategy against the given partition
    Handle {
        strategy: StrategyKind,
        partition: PartitionKind,
    },
}

/// Classify a request. First match wins, in this order:
///
/// 1. non-HTTP(S) scheme: not intercepted
/// 2. document: stale-while-revalidate, static partition
/// 3. image: cache-first, static partition
/// 4. path under the API prefix: network-first, API partition
/// 5. script or style: stale-while-revalidate, static partition
/// 6. everything else: network-first, static partition
pub fn classify(request: &FetchRequest, api_prefix: &str) -> Route {
    if !request.is_http() {
        return Route::Ignore;
    }

    match request.destination {
        Destination::Document => Route::Handle {
            strategy: StrategyKind::StaleWhileRevalidate,
            partition: PartitionKind::Static,
        },
        Destination::Image => Route::Handle {
            strategy: StrategyKind::CacheFirst,
            partition: PartitionKind::Static,
        },
        _ if request.path().starts_with(api_prefix) => Route::Handle {
            strategy: StrategyKind::NetworkFirst,
            partition: PartitionKind::Api,
        },
        Destination::Script | Destination::Style => Route::Handle {
            strategy: StrategyKind::StaleWhileRevalidate,
            partition: PartitionKind::Static,
        },
        _ => Route::Handle {
            strategy: StrategyKind::NetworkFirst,
            partition: PartitionKind::Static,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(url: &str, destination: Destination) -> Route {
        classify(&FetchRequest::get(url, destination), "/api/")
    }

    #[test]
    fn test_non_http_schemes_are_ignored() {
        assert_eq!(route("chrome-extension://abc/bg.js", Destination::Script), Route::Ignore);
        assert_eq!(route("data:text/plain,hi", Destination::Empty), Route::Ignore);
    }

    #[test]
    fn test_documents_use_stale_while_revalidate() {
        assert_eq!(
            route("https://nexo.app/posts/42", Destination::Document),
            Route::Handle {
                strategy: StrategyKind::StaleWhileRevalidate,
                partition: PartitionKind::Static,
            }
        );
    }

    #[test]
    fn test_document_under_api_prefix_stays_static() {
        // Destination checks run before the path-prefix rule.
        assert_eq!(
            route("https://nexo.app/api/docs", Destination::Document),
            Route::Handle {
                strategy: StrategyKind::StaleWhileRevalidate,
                partition: PartitionKind::Static,
            }
        );
    }

    #[test]
    fn test_images_are_cache_first() {
        assert_eq!(
            route("https://nexo.app/avatars/7.png", Destination::Image),
            Route::Handle {
                strategy: StrategyKind::CacheFirst,
                partition: PartitionKind::Static,
            }
        );
    }

    #[test]
    fn test_api_calls_are_network_first_on_api_partition() {
        assert_eq!(
            route("https://nexo.app/api/posts?page=2", Destination::Empty),
            Route::Handle {
                strategy: StrategyKind::NetworkFirst,
                partition: PartitionKind::Api,
            }
        );
    }

    #[test]
    fn test_scripts_and_styles_use_stale_while_revalidate() {
        for destination in [Destination::Script, Destination::Style] {
            assert_eq!(
                route("https://nexo.app/assets/app.js", destination),
                Route::Handle {
                    strategy: StrategyKind::StaleWhileRevalidate,
                    partition: PartitionKind::Static,
                }
            );
        }
    }

    #[test]
    fn test_default_is_network_first_on_static_partition() {
        for destination in [Destination::Font, Destination::Empty] {
            assert_eq!(
                route("https://nexo.app/fonts/inter.woff2", destination),
                Route::Handle {
                    strategy: StrategyKind::NetworkFirst,
                    partition: PartitionKind::Static,
                }
            );
        }
    }
}
