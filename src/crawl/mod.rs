// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Depth-first recursive crawl (walk.rs), one page at a time
// - Worker-pool crawl (pool.rs) that fetches several pages at once
// - Same-site restriction, swappable (site.rs)
// - Depth limit per path, and a visited set so no page is fetched twice
//
// Both crawls return the same kind of report: every term found anywhere in
// the reachable part of the site, and the list of pages that were visited.
// =============================================================================

mod pool;
mod site;
mod state;
mod walk;

#[cfg(test)]
mod test_site;

pub use site::SiteScope;
pub use state::{CrawlReport, TermSet};
pub use walk::Crawler;
