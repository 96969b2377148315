// src/report.rs
// =============================================================================
// The reporting channel between the crawler and whoever is watching it.
//
// The crawler and the term expander never print anything themselves. They
// send events through a `Reporter`:
// - the expanded vocabulary (once, before crawling)
// - "now scraping <url>" for every page that is fetched
// - warnings and errors that did NOT stop the run
//
// The CLI uses `ConsoleReporter`; tests use `RecordingReporter` to assert on
// what was reported.
// =============================================================================

use std::collections::BTreeSet;

/// Receives progress and non-fatal failure events
///
/// Implementations must be Send + Sync because the concurrent crawler
/// reports from inside futures that may run on any worker thread.
pub trait Reporter: Send + Sync {
    /// The vocabulary the crawl is going to search for
    fn expanded(&self, terms: &BTreeSet<String>);

    /// A page is about to be fetched
    fn scraping(&self, url: &str, depth_budget: usize);

    /// Something went wrong, but the run continues
    fn warning(&self, message: &str);

    /// A lookup failed outright; the run still continues with a fallback
    fn error(&self, message: &str);
}

/// Prints events to the terminal
///
/// When `quiet` is set (JSON output), progress goes to stderr so stdout
/// only carries the JSON document.
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    fn progress(&self, line: &str) {
        if self.quiet {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

impl Reporter for ConsoleReporter {
    fn expanded(&self, terms: &BTreeSet<String>) {
        let list: Vec<&str> = terms.iter().map(String::as_str).collect();
        self.progress(&format!(
            "📚 Expanded terms ({}): {}",
            terms.len(),
            list.join(", ")
        ));
    }

    fn scraping(&self, url: &str, depth_budget: usize) {
        self.progress(&format!("  Scraping [budget {}]: {}", depth_budget, url));
    }

    // Warnings and errors always go to stderr, like the rest of the
    // diagnostics, so they never end up inside --json output
    fn warning(&self, message: &str) {
        eprintln!("⚠️  {}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("❌ {}", message);
    }
}
