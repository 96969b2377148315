// src/page/mod.rs
// =============================================================================
// Everything that happens to a single page:
// - fetch: get the raw HTML over HTTP
// - html:  turn HTML into text + absolute links
// - scan:  find vocabulary terms in the text
// =============================================================================

mod fetch;
mod html;
mod scan;

pub use fetch::{HttpFetcher, Page, PageSource};
pub use html::{extract_links, resolve_links, ParsedPage};
pub use scan::scan_terms;
