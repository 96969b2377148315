// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - scan:   expand the terms, crawl a website, report which terms it mentions
// - expand: only expand the terms with MeSH and print them
//
// The raw arguments are turned into validated CrawlConfig / LookupConfig
// values here, so the rest of the program never sees unchecked input.
// =============================================================================

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::time::Duration;

use crate::config::{CrawlConfig, LookupConfig, DEFAULT_EUTILS_URL};
use crate::crawl::SiteScope;

const DEFAULT_TERMS: &str = "cancer, diabetes, hypertension";

#[derive(Parser, Debug)]
#[command(
    name = "term-crawler",
    version = "0.1.0",
    about = "Find disease terms (and their MeSH synonyms) across a website",
    long_about = "term-crawler expands a few disease terms into MeSH descriptor names and synonyms \
                  using NCBI E-utilities, then crawls a website up to a given depth and reports \
                  which of those terms appear on it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug logs from the crawler on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website and report which terms appear on it
    ///
    /// Example: term-crawler scan https://example.com --terms "cancer, diabetes" --max-depth 2
    Scan(ScanArgs),

    /// Expand terms with MeSH synonyms without crawling anything
    ///
    /// Example: term-crawler expand --terms "asthma"
    Expand {
        /// Comma-separated disease terms
        #[arg(long, default_value = DEFAULT_TERMS)]
        terms: String,

        #[command(flatten)]
        lookup: LookupArgs,

        /// Output results in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Website URL to crawl (e.g., https://example.com)
    pub website_url: String,

    /// Comma-separated disease terms
    #[arg(long, default_value = DEFAULT_TERMS)]
    pub terms: String,

    /// Maximum crawl depth, 1 to 5
    ///
    /// Depth 1 = just the starting page
    /// Depth 2 = starting page + the same-site pages it links to
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub max_depth: u8,

    /// Search for the terms exactly as given, without MeSH expansion
    #[arg(long)]
    pub no_expand: bool,

    /// Which links count as "the same site"
    #[arg(long, value_enum, default_value_t = ScopeArg::Substring)]
    pub scope: ScopeArg,

    /// Number of pages fetched at the same time (1 = depth-first, one by one)
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,

    /// Per-page request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    #[command(flatten)]
    pub lookup: LookupArgs,

    /// Output results in JSON format instead of text
    #[arg(long)]
    pub json: bool,
}

/// NCBI E-utilities settings
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Contact email sent to NCBI with every request
    #[arg(long, env = "NCBI_EMAIL")]
    pub email: Option<String>,

    /// NCBI API key (optional, raises the request quota)
    #[arg(long, env = "NCBI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// E-utilities base URL
    #[arg(long, default_value = DEFAULT_EUTILS_URL, hide = true)]
    pub eutils_url: String,
}

/// --scope values
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeArg {
    /// Follow links that contain the current page's URL
    Substring,
    /// Follow links with the same scheme, host and port
    Origin,
}

impl From<ScopeArg> for SiteScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Substring => SiteScope::Substring,
            ScopeArg::Origin => SiteScope::Origin,
        }
    }
}

impl ScanArgs {
    pub fn crawl_config(&self) -> Result<CrawlConfig> {
        let config = CrawlConfig {
            root_url: self.website_url.trim().to_string(),
            max_depth: usize::from(self.max_depth),
            scope: self.scope.into(),
            concurrency: self.concurrency,
            fetch_timeout: Duration::from_secs(self.timeout),
        };
        config.validate()?;
        Ok(config)
    }
}

impl LookupArgs {
    pub fn lookup_config(&self) -> Result<LookupConfig> {
        let email = self.email.as_deref().ok_or_else(|| {
            anyhow!("MeSH expansion needs a contact email: pass --email or set NCBI_EMAIL")
        })?;

        let config = LookupConfig::new(email.trim())
            .with_base_url(self.eutils_url.as_str())
            .with_api_key(self.api_key.clone());
        config.validate()?;
        Ok(config)
    }
}
