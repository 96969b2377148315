// src/error.rs
// =============================================================================
// Error types for the three collaborator boundaries of the crawler.
//
// - FetchError:  getting a page over HTTP failed
// - ParseError:  a page (or its URL) could not be turned into text and links
// - LookupError: the MeSH terminology lookup failed for one term
//
// None of these ever stop a crawl. The crawler and the term expander catch
// them, report them, and carry on with an empty (or fallback) result.
// =============================================================================

use thiserror::Error;

/// Errors that can occur while fetching a page
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, DNS, TLS or body decoding failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The request did not finish within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// The server answered with a non-2xx status.
    /// The body is kept so links can still be discovered from it.
    #[error("HTTP {status}")]
    Status { status: u16, body: String },
}

impl FetchError {
    /// Body of a partial (non-2xx) response, if one was received
    pub fn partial_body(&self) -> Option<&str> {
        match self {
            FetchError::Status { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }
}

/// Errors that can occur while parsing a fetched page
#[derive(Error, Debug)]
pub enum ParseError {
    /// The URL links should be resolved against is not a valid absolute URL
    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// CSS selector could not be compiled
    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// Errors that can occur while looking up a term in MeSH
#[derive(Error, Debug)]
pub enum LookupError {
    /// Network failure talking to E-utilities
    #[error("E-utilities request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// E-utilities answered, but the payload was not what we expected
    #[error("Malformed E-utilities response: {0}")]
    Malformed(String),

    /// E-utilities reported an error (bad query, quota exceeded, ...)
    #[error("E-utilities error: {0}")]
    Service(String),
}
