// src/page/fetch.rs
// =============================================================================
// This module fetches web pages over HTTP.
//
// The crawler does not talk to reqwest directly. It talks to a `PageSource`,
// so tests can hand it an in-memory website instead of a real one.
//
// Failure modes we distinguish:
// - Timeout: the request took longer than the configured limit
// - Status:  the server answered with a non-2xx code (we keep the body)
// - Http:    everything else reqwest can fail with (DNS, TLS, connect, ...)
// =============================================================================

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

use crate::error::FetchError;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct Page {
    /// Raw response body (HTML, usually)
    pub body: String,
    /// Value of the Content-Type header, if the server sent one
    pub content_type: Option<String>,
    /// HTTP status code (always 2xx for a successful fetch)
    pub status: u16,
}

/// Anything that can turn a URL into a page
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError>;
}

/// The real HTTP client
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5)) // Follow up to 5 redirects
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let response = self.client.get(url).send().await.map_err(categorize_error)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.text().await.map_err(categorize_error)?;

        tracing::debug!(
            url,
            status = status.as_u16(),
            content_type = content_type.as_deref().unwrap_or("unknown"),
            bytes = body.len(),
            "fetched page"
        );

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Page {
            body,
            content_type,
            status: status.as_u16(),
        })
    }
}

// Timeouts get their own variant so they read clearly in warnings
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Http(error)
    }
}
