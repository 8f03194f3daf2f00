//! # Network Fetcher
//!
//! The transport is isolated behind the [`Fetcher`] trait so every caching
//! strategy can be exercised without a live network. [`HttpFetcher`] is the
//! reqwest-backed implementation used in production.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::config::WorkerConfig;
use crate::error::OfflineError;
use crate::fetch::FetchRequest;
use crate::response::ResponseSnapshot;

/// A transport capable of resolving a request against the network
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform the network fetch for a request.
    ///
    /// An `Err` means the network was unreachable or the transfer failed
    /// mid-flight; HTTP error statuses are returned as successful snapshots
    /// with the corresponding status code.
    async fn fetch(&self, request: &FetchRequest) -> Result<ResponseSnapshot, OfflineError>;
}

/// Create a reqwest Client with the provided configuration
pub fn create_client(config: &WorkerConfig) -> Result<Client, OfflineError> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static("text/html,application/json;q=0.9,*/*;q=0.8"),
    );
    default_headers.insert(
        reqwest::header::ACCEPT_ENCODING,
        HeaderValue::from_static("gzip, deflate"),
    );

    let mut client_builder = Client::builder()
        .pool_max_idle_per_host(5)
        .user_agent(&config.user_agent)
        .default_headers(default_headers)
        .redirect(reqwest::redirect::Policy::limited(10));

    if !config.request_timeout.is_zero() {
        client_builder = client_builder.timeout(config.request_timeout);
    }

    if !config.connect_timeout.is_zero() {
        client_builder = client_builder.connect_timeout(config.connect_timeout);
    }

    client_builder.build().map_err(OfflineError::from)
}

/// Reqwest-backed [`Fetcher`]
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with a client built from the given configuration
    pub fn new(config: &WorkerConfig) -> Result<Self, OfflineError> {
        Ok(Self {
            client: create_client(config)?,
        })
    }

    /// Create a fetcher from an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<ResponseSnapshot, OfflineError> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|_| OfflineError::Url(format!("invalid method {}", request.method)))?;

        let mut builder = self.client.request(method, &request.url);
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("").to_string();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body: Bytes = response.bytes().await?;

        debug!(
            url = %request.url,
            status = status.as_u16(),
            bytes = body.len(),
            "Fetched response from network"
        );

        Ok(ResponseSnapshot {
            status: status.as_u16(),
            status_text,
            headers,
            body,
        })
    }
}
