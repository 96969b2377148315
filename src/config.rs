// src/config.rs
// =============================================================================
// Runtime configuration for a scan.
//
// clap gives us raw strings and numbers; this module turns them into two
// validated values that are passed explicitly to the parts that need them:
// - CrawlConfig:  root URL, depth, same-site rule, concurrency, timeout
// - LookupConfig: everything the NCBI E-utilities client needs
//
// Nothing here is global. Two scans with different contact emails can run
// side by side in the same process.
// =============================================================================

use anyhow::{anyhow, bail, Result};
use std::time::Duration;
use url::Url;

use crate::crawl::SiteScope;

/// Public E-utilities endpoint
pub const DEFAULT_EUTILS_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Tool name sent to NCBI alongside the contact email
pub const TOOL_NAME: &str = "term-crawler";

/// Deepest crawl the CLI allows
pub const MAX_DEPTH_LIMIT: usize = 5;

/// Settings for one crawl
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub root_url: String,
    pub max_depth: usize,
    pub scope: SiteScope,
    /// 1 = sequential depth-first crawl, >1 = worker pool of that size
    pub concurrency: usize,
    pub fetch_timeout: Duration,
}

impl CrawlConfig {
    /// Checks the settings before any request is made
    pub fn validate(&self) -> Result<()> {
        let root = Url::parse(&self.root_url)
            .map_err(|e| anyhow!("Invalid URL '{}': {}", self.root_url, e))?;

        if root.scheme() != "http" && root.scheme() != "https" {
            bail!("Only http(s) URLs can be crawled, got '{}'", self.root_url);
        }

        if self.max_depth == 0 || self.max_depth > MAX_DEPTH_LIMIT {
            bail!(
                "Max depth must be between 1 and {}, got {}",
                MAX_DEPTH_LIMIT,
                self.max_depth
            );
        }

        if self.concurrency == 0 {
            bail!("Concurrency must be at least 1");
        }

        if self.fetch_timeout.is_zero() {
            bail!("Fetch timeout must be at least 1 second");
        }

        Ok(())
    }
}

/// Settings for the MeSH lookup client
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Contact email NCBI asks every client to identify itself with
    pub email: String,
    pub tool: String,
    /// Optional NCBI API key (raises the request quota)
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl LookupConfig {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            tool: TOOL_NAME.to_string(),
            api_key: None,
            base_url: DEFAULT_EUTILS_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.email.contains('@') {
            bail!("'{}' does not look like an email address", self.email);
        }

        Url::parse(&self.base_url)
            .map_err(|e| anyhow!("Invalid E-utilities URL '{}': {}", self.base_url, e))?;

        Ok(())
    }
}
