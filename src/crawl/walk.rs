// src/crawl/walk.rs
// =============================================================================
// This module implements the depth-first crawl.
//
// How it works, for one page:
// 1. Stop right away if the depth budget is used up or the URL was visited
// 2. Mark the URL as visited (BEFORE looking at any of its links)
// 3. Fetch the page
// 4. Scan its text for vocabulary terms
// 5. Resolve all of its links to absolute URLs
// 6. Keep the links that are on the same site and not visited yet
// 7. Crawl each of them with one less unit of depth budget
// 8. Return this page's terms plus everything the children found
//
// Failures never stop the crawl. A page that can't be fetched contributes
// no terms; if the server still sent a body (404 page, 500 page...) its links
// are followed anyway.
//
// Rust concepts:
// - BoxFuture: an async fn can't call itself directly, because its future
//   would contain itself. Boxing the future breaks the cycle.
// - Arc<dyn Reporter>: shared, thread-safe handle to the progress reporter
// =============================================================================

use futures::future::{BoxFuture, FutureExt};
use std::collections::BTreeSet;
use std::sync::Arc;

use super::site::SiteScope;
use super::state::{CrawlReport, FoundTerms, TermSet, VisitedSet};
use crate::page::{extract_links, resolve_links, scan_terms, PageSource, ParsedPage};
use crate::report::Reporter;

/// What one fetched page contributes
pub(super) struct NodeOutcome {
    pub own_terms: FoundTerms,
    pub links: BTreeSet<String>,
}

/// Crawls a website looking for vocabulary terms
pub struct Crawler<S> {
    pub(super) source: S,
    pub(super) reporter: Arc<dyn Reporter>,
    pub(super) scope: SiteScope,
}

impl<S: PageSource> Crawler<S> {
    pub fn new(source: S, reporter: Arc<dyn Reporter>, scope: SiteScope) -> Self {
        Self {
            source,
            reporter,
            scope,
        }
    }

    /// Crawls from `root` with a fresh visited set
    pub async fn run(&self, root: &str, terms: &TermSet, max_depth: usize) -> CrawlReport {
        let mut visited = VisitedSet::new();
        let found = self.crawl(root, terms, max_depth, &mut visited).await;

        tracing::debug!(root, pages = visited.len(), found = found.len(), "crawl finished");

        CrawlReport {
            found,
            visited: visited.into_sorted(),
        }
    }

    /// Terms found at `url` and every same-site page below it
    ///
    /// `visited` is shared by the whole traversal; a URL already in it
    /// contributes nothing and is not fetched again.
    pub fn crawl<'a>(
        &'a self,
        url: &'a str,
        terms: &'a TermSet,
        depth_budget: usize,
        visited: &'a mut VisitedSet,
    ) -> BoxFuture<'a, FoundTerms> {
        async move {
            if depth_budget == 0 || !visited.mark(url) {
                return FoundTerms::new();
            }

            let node = self.visit(url, terms, depth_budget).await;
            let mut found = node.own_terms;

            for link in node.links {
                // Re-checked per link: an earlier sibling may have reached it
                if !self.scope.admits(url, &link) || visited.contains(&link) {
                    continue;
                }

                let subpage_terms = self.crawl(&link, terms, depth_budget - 1, visited).await;
                found.extend(subpage_terms);
            }

            found
        }
        .boxed()
    }

    /// Fetches and parses one page; never fails
    pub(super) async fn visit(&self, url: &str, terms: &TermSet, depth_budget: usize) -> NodeOutcome {
        self.reporter.scraping(url, depth_budget);

        match self.source.fetch(url).await {
            Ok(page) => {
                tracing::debug!(
                    url,
                    status = page.status,
                    content_type = page.content_type.as_deref().unwrap_or("unknown"),
                    "scanning page"
                );

                let parsed = ParsedPage::parse(&page.body).and_then(|parsed| {
                    let links = resolve_links(&parsed.hrefs, url)?;
                    Ok((parsed.text, links))
                });

                match parsed {
                    Ok((text, links)) => NodeOutcome {
                        own_terms: scan_terms(&text, terms.iter()),
                        links,
                    },
                    Err(e) => {
                        self.reporter
                            .warning(&format!("Error parsing {}: {}", url, e));
                        NodeOutcome {
                            own_terms: FoundTerms::new(),
                            links: BTreeSet::new(),
                        }
                    }
                }
            }
            Err(e) => {
                self.reporter
                    .warning(&format!("Error scraping {}: {}", url, e));

                // A non-2xx answer may still carry a page full of links
                let links = match e.partial_body() {
                    Some(body) => extract_links(body, url).unwrap_or_else(|pe| {
                        self.reporter.warning(&format!(
                            "Error processing subpages for {}: {}",
                            url, pe
                        ));
                        BTreeSet::new()
                    }),
                    None => BTreeSet::new(),
                };

                NodeOutcome {
                    own_terms: FoundTerms::new(),
                    links,
                }
            }
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why mark visited before fetching?
//    - If A links to B and B links back to A, the second visit to A must see
//      A as already visited, even if fetching A failed
//    - Marking first means every URL is fetched at most once, full stop
//
// 2. Why is the depth budget per path?
//    - Each recursive call gets depth_budget - 1 of ITS parent
//    - A page three hops deep on one branch doesn't use up budget on another
//
// 3. Why does link order not matter for the result?
//    - Results are merged with set union, which doesn't care about order
//    - Which branch reaches a shared page first can change which pages are
//      fetched when the budget is tight, but never duplicates a fetch
// -----------------------------------------------------------------------------
