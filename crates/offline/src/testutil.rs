//! Test helpers shared across module test suites.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::OfflineError;
use crate::fetch::FetchRequest;
use crate::fetcher::Fetcher;
use crate::response::ResponseSnapshot;

#[inline]
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

enum Outcome {
    Respond(ResponseSnapshot),
    Fail,
}

/// Scripted [`Fetcher`] recording every fetch it receives.
///
/// URLs without a scripted outcome behave as unreachable network.
pub(crate) struct MockFetcher {
    outcomes: Mutex<HashMap<String, Outcome>>,
    calls: Mutex<Vec<String>>,
    delay: Mutex<Option<Duration>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            delay: Mutex::new(None),
        }
    }

    /// Script a successful snapshot for a URL
    pub fn respond(&self, url: impl Into<String>, snapshot: ResponseSnapshot) {
        self.outcomes.lock().insert(url.into(), Outcome::Respond(snapshot));
    }

    /// Script a network failure for a URL
    pub fn fail(&self, url: impl Into<String>) {
        self.outcomes.lock().insert(url.into(), Outcome::Fail);
    }

    /// Delay every fetch, simulating a slow network
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// URLs fetched so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// How many times the given URL was fetched
    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<ResponseSnapshot, OfflineError> {
        self.calls.lock().push(request.url.clone());

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.outcomes.lock().get(&request.url) {
            Some(Outcome::Respond(snapshot)) => Ok(snapshot.clone()),
            Some(Outcome::Fail) | None => Err(OfflineError::Unreachable(request.url.clone())),
        }
    }
}
