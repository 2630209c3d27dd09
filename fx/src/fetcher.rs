//! Remote feed transport.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{FxError, FxResult};

/// Trait for fetching raw feed documents.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Get the fetcher name.
    fn name(&self) -> &str;

    /// Download the document at `url`. Exactly one attempt is made.
    async fn fetch(&self, url: &str) -> FxResult<Vec<u8>>;
}

/// Fetches documents over HTTPS with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFeedFetcher {
    client: reqwest::Client,
}

impl HttpFeedFetcher {
    /// Create a fetcher with the given request timeout and user agent.
    pub fn new(timeout: Duration, user_agent: &str) -> FxResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| FxError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn fetch(&self, url: &str) -> FxResult<Vec<u8>> {
        let fetch_error = |message: String| FxError::Fetch {
            url: url.to_string(),
            message,
        };

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                fetch_error(format!("request timeout: {}", e))
            } else if e.is_connect() {
                fetch_error(format!("connection failed: {}", e))
            } else {
                fetch_error(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("unexpected status {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| fetch_error(format!("failed to read response body: {}", e)))?;

        debug!(url, bytes = body.len(), "Fetched feed document");
        Ok(body.to_vec())
    }
}

/// Mock fetcher for testing.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockFeedFetcher {
    name: String,
    documents: dashmap::DashMap<String, Vec<u8>>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockFeedFetcher {
    /// Create a new mock fetcher with no documents.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: dashmap::DashMap::new(),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Serve `body` for `url`.
    pub fn set_document(&self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.documents.insert(url.into(), body.into());
    }

    /// Number of fetch attempts so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl FeedFetcher for MockFeedFetcher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, url: &str) -> FxResult<Vec<u8>> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.documents
            .get(url)
            .map(|body| body.clone())
            .ok_or_else(|| FxError::Fetch {
                url: url.to_string(),
                message: "no document".to_string(),
            })
    }
}
