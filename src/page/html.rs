// src/page/html.rs
// =============================================================================
// This module turns raw HTML into the two things the crawler needs:
// - the page's text content (for term scanning)
// - the absolute URLs of every <a href> on the page (for recursion)
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Never fails on malformed HTML (html5ever recovers like a browser does)
//
// We also use the `url` crate to resolve relative links to absolute URLs.
//
// Link extraction is purely syntactic: it does NOT decide which links are
// "on the same site". That decision belongs to the crawler.
// =============================================================================

use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

use crate::error::ParseError;

/// Text and raw link targets of a parsed page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// All text nodes of the document, concatenated
    pub text: String,
    /// Every href attribute of every <a> element, as written in the markup
    pub hrefs: Vec<String>,
}

impl ParsedPage {
    /// Parses an HTML document
    ///
    /// The scraper DOM is dropped before returning, so the result can be
    /// held across `.await` points (scraper's `Html` is not `Send`).
    pub fn parse(markup: &str) -> Result<Self, ParseError> {
        let document = Html::parse_document(markup);

        // "a[href]" means "all <a> tags that have an href attribute"
        let selector =
            Selector::parse("a[href]").map_err(|e| ParseError::Selector(e.to_string()))?;

        let text = document.root_element().text().collect::<String>();

        let hrefs = document
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_string)
            .collect();

        Ok(Self { text, hrefs })
    }
}

// Extracts all links from HTML content as absolute URLs
//
// Parameters:
//   markup: the HTML content to parse
//   origin_url: the URL of the page (for resolving relative links)
//
// Example:
//   markup = "<a href='/docs'>Docs</a>"
//   origin_url = "https://example.com/page"
//   result = {"https://example.com/docs"}
pub fn extract_links(markup: &str, origin_url: &str) -> Result<BTreeSet<String>, ParseError> {
    let page = ParsedPage::parse(markup)?;
    resolve_links(&page.hrefs, origin_url)
}

/// Resolves raw href values against the page they were found on
///
/// hrefs that cannot be resolved are skipped; an origin that is not a valid
/// absolute URL is an error, since nothing on the page could be resolved.
pub fn resolve_links(hrefs: &[String], origin_url: &str) -> Result<BTreeSet<String>, ParseError> {
    let base = Url::parse(origin_url).map_err(|source| ParseError::InvalidBaseUrl {
        url: origin_url.to_string(),
        source,
    })?;

    let mut links = BTreeSet::new();
    for href in hrefs {
        match base.join(href.trim()) {
            Ok(url) => {
                links.insert(url.to_string());
            }
            Err(e) => {
                tracing::debug!(origin = origin_url, href = %href, error = %e, "skipping unresolvable href");
            }
        }
    }

    Ok(links)
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. How does Url::join resolve things?
//    - base = "https://example.com/page/"
//    - "/docs"              -> "https://example.com/docs"        (root-relative)
//    - "../about"           -> "https://example.com/about"       (relative)
//    - "//cdn.example.com/" -> "https://cdn.example.com/"        (protocol-relative)
//    - "#intro"             -> "https://example.com/page/#intro" (fragment-only)
//    - "https://other.com"  -> "https://other.com/"              (already absolute)
//
// 2. Why BTreeSet instead of Vec?
//    - The same link often appears several times on a page (nav + footer)
//    - A set drops duplicates, and BTreeSet keeps a stable order for logs
//
// 3. Why collect text with .collect::<String>()?
//    - text() yields every text node in document order
//    - Joining them without a separator mirrors what a browser's
//      textContent gives you
// -----------------------------------------------------------------------------
