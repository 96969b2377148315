// src/crawl/site.rs
// =============================================================================
// Decides whether a discovered link still belongs to "the same site".
//
// Two rules are available:
//
// - Substring (default): the link must contain the URL of the page it was
//   found on. From "https://site.example/docs/" this follows
//   "https://site.example/docs/intro" but not "https://site.example/blog".
//   Loose and path-sensitive, but it is what the crawl has always done.
//
// - Origin: scheme, host and port must match the page's. Every page of
//   "https://site.example" is reachable from every other one.
//
// Swapping the rule never touches the traversal code.
// =============================================================================

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SiteScope {
    #[default]
    Substring,
    Origin,
}

impl SiteScope {
    /// Whether `candidate`, found on `origin`, may be crawled
    pub fn admits(&self, origin: &str, candidate: &str) -> bool {
        match self {
            SiteScope::Substring => candidate.contains(origin),
            SiteScope::Origin => match (Url::parse(origin), Url::parse(candidate)) {
                (Ok(origin), Ok(candidate)) => {
                    matches!(candidate.scheme(), "http" | "https")
                        && origin.origin() == candidate.origin()
                }
                _ => false,
            },
        }
    }
}
