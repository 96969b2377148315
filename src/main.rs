// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing) on stderr
// 3. Dispatch to the appropriate subcommand handler
// 4. Print results as text or JSON
// 5. Exit with proper code (0 = terms found, 1 = no terms found, 2 = error)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;           // src/cli.rs - command-line parsing
mod config;        // src/config.rs - validated runtime settings
mod crawl;         // src/crawl/ - website crawling logic
mod error;         // src/error.rs - fetch / parse / lookup errors
mod page;          // src/page/ - fetching, parsing and scanning one page
mod report;        // src/report.rs - progress and warning events
mod vocab;         // src/vocab/ - MeSH term expansion

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands, LookupArgs, ScanArgs};
use crawl::{CrawlReport, Crawler, TermSet};
use page::HttpFetcher;
use report::{ConsoleReporter, Reporter};
use vocab::{parse_seed_terms, EntrezClient, TermExpander};

// The #[tokio::main] attribute transforms our async main into a real main function
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = terms found (or vocabulary printed)
//   Ok(1) = no terms found
//   Err   = invalid input or setup failure
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    match cli.command {
        Commands::Scan(args) => handle_scan(args).await,
        Commands::Expand { terms, lookup, json } => handle_expand(&terms, &lookup, json).await,
    }
}

// Logs go to stderr so they never mix with --json output.
// RUST_LOG overrides the default level unless --verbose is given.
fn setup_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("term_crawler=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("term_crawler=info,warn"))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// What `scan --json` prints
#[derive(Serialize)]
struct ScanOutput<'a> {
    root_url: &'a str,
    max_depth: usize,
    expanded_terms: &'a BTreeSet<String>,
    #[serde(flatten)]
    report: &'a CrawlReport,
}

/// What `expand --json` prints
#[derive(Serialize)]
struct ExpandOutput<'a> {
    seed_terms: &'a [String],
    expanded_terms: &'a BTreeSet<String>,
}

// Handles the 'scan' subcommand
async fn handle_scan(args: ScanArgs) -> Result<i32> {
    let config = args.crawl_config()?;

    let seeds = parse_seed_terms(&args.terms);
    if seeds.is_empty() {
        bail!("No terms to search for. Pass them with --terms \"cancer, diabetes\"");
    }

    let reporter: Arc<dyn Reporter> = Arc::new(ConsoleReporter::new(args.json));

    if !args.json {
        println!("🔍 Scanning website: {}", config.root_url);
        println!("📊 Max crawl depth: {}", config.max_depth);
    }

    // The expander reports the vocabulary itself; --no-expand reports the seeds
    let expanded = if args.no_expand {
        let seeds: BTreeSet<String> = seeds.iter().cloned().collect();
        reporter.expanded(&seeds);
        seeds
    } else {
        expand_terms(&args.lookup, &seeds, reporter.clone()).await?
    };

    let terms = TermSet::new(&expanded);
    tracing::info!(terms = terms.len(), root = %config.root_url, "starting crawl");

    let fetcher = HttpFetcher::new(config.fetch_timeout).context("Failed to create HTTP client")?;
    let crawler = Crawler::new(fetcher, reporter, config.scope);

    let report = if config.concurrency > 1 {
        crawler
            .crawl_concurrent(&config.root_url, &terms, config.max_depth, config.concurrency)
            .await
    } else {
        crawler.run(&config.root_url, &terms, config.max_depth).await
    };

    if args.json {
        let output = ScanOutput {
            root_url: &config.root_url,
            max_depth: config.max_depth,
            expanded_terms: &expanded,
            report: &report,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_scan_summary(&report);
    }

    if report.found.is_empty() {
        Ok(1) // Exit code 1 = nothing found
    } else {
        Ok(0)
    }
}

// Handles the 'expand' subcommand
async fn handle_expand(terms: &str, lookup: &LookupArgs, json: bool) -> Result<i32> {
    let seeds = parse_seed_terms(terms);
    if seeds.is_empty() {
        bail!("No terms to expand. Pass them with --terms \"cancer, diabetes\"");
    }

    let reporter: Arc<dyn Reporter> = Arc::new(ConsoleReporter::new(json));
    let expanded = expand_terms(lookup, &seeds, reporter).await?;

    if json {
        let output = ExpandOutput {
            seed_terms: &seeds,
            expanded_terms: &expanded,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        // The reporter has already printed the full list
        println!("   ({} seed term(s))", seeds.len());
    }

    Ok(0)
}

async fn expand_terms(
    lookup: &LookupArgs,
    seeds: &[String],
    reporter: Arc<dyn Reporter>,
) -> Result<BTreeSet<String>> {
    let config = lookup.lookup_config()?;
    let client = EntrezClient::new(config).context("Failed to create E-utilities client")?;
    let expander = TermExpander::new(client, reporter);
    Ok(expander.expand(seeds).await)
}

fn print_scan_summary(report: &CrawlReport) {
    println!();
    println!("📄 Crawled {} page(s)", report.visited.len());

    if report.found.is_empty() {
        println!("⚠️  No disease terms found.");
    } else {
        let found: Vec<&str> = report.found.iter().map(String::as_str).collect();
        println!("✅ Found the following disease terms: {}", found.join(", "));
    }
}
