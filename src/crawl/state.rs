// src/crawl/state.rs
// =============================================================================
// The data a crawl carries around:
// - TermSet:     the vocabulary being searched for (always lower-case)
// - VisitedSet:  URLs already dispatched during this crawl
// - FoundTerms:  terms seen somewhere in a subtree, merged by set union
// - CrawlReport: what a top-level crawl hands back
// =============================================================================

use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// Terms found on a page or in a whole subtree
pub type FoundTerms = BTreeSet<String>;

/// Lower-cased vocabulary to search pages for
#[derive(Debug, Clone, Default)]
pub struct TermSet {
    terms: BTreeSet<String>,
}

impl TermSet {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }
}

/// URLs already dispatched in one crawl
///
/// A URL goes in once, before anything below it is explored, and never
/// comes out. That alone guarantees the crawl terminates on cyclic sites.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Check-and-mark: returns false if `url` was already there
    pub fn mark(&mut self, url: &str) -> bool {
        if self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn into_sorted(self) -> Vec<String> {
        let mut urls: Vec<String> = self.urls.into_iter().collect();
        urls.sort();
        urls
    }
}

/// Result of a top-level crawl
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    /// Union of the terms found on every fetched page
    pub found: FoundTerms,
    /// Every URL that was dispatched, sorted
    pub visited: Vec<String>,
}
