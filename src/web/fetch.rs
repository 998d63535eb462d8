//! HTTP page fetching with a bounded timeout and retry on transient failures.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{info, warn};

use crate::errors::BotError;

const USER_AGENT: &str = concat!("tldr-bot/", env!("CARGO_PKG_VERSION"));
const MAX_ATTEMPTS: usize = 3;
const MAX_BACKOFF: Duration = Duration::from_secs(1);
/// Pages larger than this are cut before extraction.
pub const MAX_PAGE_BYTES: usize = 5 * 1024 * 1024;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Raw response body of `GET url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BotError>;
}

/// `timeout` bounds each attempt; the whole fetch gets room for every retry.
pub struct HttpPageFetcher {
    client: Client,
    timeout: Duration,
    max_page_bytes: usize,
}

#[derive(Debug)]
struct Attempt {
    error: BotError,
    transient: bool,
}

impl Attempt {
    fn from_reqwest(e: reqwest::Error) -> Self {
        Self {
            transient: e.is_timeout() || e.is_connect(),
            error: BotError::from(e),
        }
    }
}

impl HttpPageFetcher {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, BotError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| BotError::FetchError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            timeout,
            max_page_bytes: MAX_PAGE_BYTES,
        })
    }

    #[must_use]
    pub fn with_max_page_bytes(mut self, max_page_bytes: usize) -> Self {
        self.max_page_bytes = max_page_bytes;
        self
    }

    /// Upper bound on one `fetch`: every attempt plus the longest backoff
    /// between them.
    fn deadline(&self) -> Duration {
        let attempts = MAX_ATTEMPTS as u32;
        self.timeout * attempts + MAX_BACKOFF * (attempts - 1)
    }

    async fn fetch_once(&self, url: &str) -> Result<Vec<u8>, Attempt> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(Attempt::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Attempt {
                error: BotError::FetchError(format!("GET {url} returned {status}")),
                transient: is_transient_status(status),
            });
        }

        // Stop reading at the cap instead of buffering the whole page.
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(Attempt::from_reqwest)? {
            let room = self.max_page_bytes - body.len();
            if chunk.len() > room {
                body.extend_from_slice(&chunk[..room]);
                warn!("Truncating page from {} at {} bytes", url, self.max_page_bytes);
                break;
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

fn backoff() -> impl Iterator<Item = Duration> {
    // 200ms, then capped at MAX_BACKOFF
    ExponentialBackoff::from_millis(2)
        .factor(100)
        .max_delay(MAX_BACKOFF)
        .map(jitter)
        .take(MAX_ATTEMPTS - 1)
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BotError> {
        let attempts = RetryIf::spawn(
            backoff(),
            || self.fetch_once(url),
            |attempt: &Attempt| attempt.transient,
        );

        let deadline = self.deadline();
        let body = tokio::time::timeout(deadline, attempts)
            .await
            .map_err(|_| BotError::FetchError(format!("GET {url} timed out after {deadline:?}")))?
            .map_err(|attempt| attempt.error)?;

        info!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
