// src/page/scan.rs
// =============================================================================
// Finds which terms of a vocabulary appear in a page's text.
//
// Matching is case-insensitive substring containment, nothing more:
// "diabetes" matches inside "prediabetes". There is no word-boundary logic.
// =============================================================================

use std::collections::BTreeSet;

/// Returns the lower-cased candidates that occur in `page_text`
pub fn scan_terms<'a, I>(page_text: &str, candidates: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let haystack = page_text.to_lowercase();

    candidates
        .into_iter()
        .map(str::to_lowercase)
        .filter(|term| haystack.contains(term.as_str()))
        .collect()
}
