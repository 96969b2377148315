// src/crawl/pool.rs
// =============================================================================
// Concurrent crawl: up to N pages are fetched at the same time.
//
// Instead of recursion we keep a queue of (url, depth budget) items:
// 1. Start with the root URL in the queue
// 2. While fewer than N fetches are running, pop an item and start it
//    (skipping it if its budget is 0 or its URL was already dispatched)
// 3. When a fetch finishes, merge its terms and queue its same-site links
//    with budget - 1
// 4. Stop when the queue is empty and nothing is running
//
// Only this loop touches the visited set, and it checks-and-marks a URL in
// one step before starting its fetch, so no URL is ever fetched twice.
// Depth still travels with each item, so budgets stay per path.
//
// Rust concepts:
// - FuturesUnordered: a set of running futures; .next() yields whichever
//   finishes first
// - VecDeque: the work queue (push_back / pop_front)
// =============================================================================

use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::VecDeque;

use super::state::{CrawlReport, FoundTerms, TermSet, VisitedSet};
use super::walk::Crawler;
use crate::page::PageSource;

// Represents a page waiting in the crawl queue
#[derive(Debug, Clone)]
struct CrawlItem {
    url: String,
    depth_budget: usize,
}

impl<S: PageSource> Crawler<S> {
    /// Crawls from `root` fetching up to `concurrency` pages at once
    pub async fn crawl_concurrent(
        &self,
        root: &str,
        terms: &TermSet,
        max_depth: usize,
        concurrency: usize,
    ) -> CrawlReport {
        let concurrency = concurrency.max(1);

        let mut visited = VisitedSet::new();
        let mut found = FoundTerms::new();

        let mut queue = VecDeque::new();
        queue.push_back(CrawlItem {
            url: root.to_string(),
            depth_budget: max_depth,
        });

        let mut in_flight = FuturesUnordered::new();

        loop {
            // Fill the pool
            while in_flight.len() < concurrency {
                let Some(item) = queue.pop_front() else {
                    break;
                };

                if item.depth_budget == 0 || !visited.mark(&item.url) {
                    continue;
                }

                in_flight.push(async move {
                    let node = self.visit(&item.url, terms, item.depth_budget).await;
                    (item, node)
                });
            }

            // Nothing running means nothing left in the queue either
            let Some((item, node)) = in_flight.next().await else {
                break;
            };

            found.extend(node.own_terms);

            for link in node.links {
                if self.scope.admits(&item.url, &link) && !visited.contains(&link) {
                    queue.push_back(CrawlItem {
                        url: link,
                        depth_budget: item.depth_budget - 1,
                    });
                }
            }
        }

        tracing::debug!(
            root,
            pages = visited.len(),
            found = found.len(),
            concurrency,
            "concurrent crawl finished"
        );

        CrawlReport {
            found,
            visited: visited.into_sorted(),
        }
    }
}
