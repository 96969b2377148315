// src/vocab/expand.rs
// =============================================================================
// Turns a handful of seed terms ("cancer, diabetes") into a bigger vocabulary
// of MeSH descriptor names and synonyms.
//
// Fail-soft policy: a term that can't be expanded (no match, network error,
// weird response) is kept as-is and a warning/error is reported. Expansion
// never stops the crawl from running.
// =============================================================================

use std::collections::BTreeSet;
use std::sync::Arc;

use super::entrez::Terminology;
use crate::error::LookupError;
use crate::report::Reporter;

/// Splits comma-separated user input into seed terms
///
/// Whitespace is trimmed, blank entries are dropped (an empty term would
/// match every page), and repeated terms are kept once.
pub fn parse_seed_terms(input: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    input
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .filter(|term| seen.insert(term.to_string()))
        .map(str::to_string)
        .collect()
}

/// Expands seed terms through a terminology service
pub struct TermExpander<T> {
    source: T,
    reporter: Arc<dyn Reporter>,
}

impl<T: Terminology> TermExpander<T> {
    pub fn new(source: T, reporter: Arc<dyn Reporter>) -> Self {
        Self { source, reporter }
    }

    /// Union of every seed term's synonyms, original case preserved
    ///
    /// The result is also sent to the reporter as the session's vocabulary.
    pub async fn expand(&self, seeds: &[String]) -> BTreeSet<String> {
        let mut expanded = BTreeSet::new();
        for seed in seeds {
            expanded.extend(self.lookup_synonyms(seed).await);
        }
        self.reporter.expanded(&expanded);
        expanded
    }

    /// Descriptor name + synonyms for one term, or just the term on failure
    pub async fn lookup_synonyms(&self, term: &str) -> Vec<String> {
        match self.try_lookup(term).await {
            Ok(Some(terms)) => terms,
            Ok(None) => {
                self.reporter
                    .warning(&format!("No MeSH terms found for '{}'", term));
                vec![term.to_string()]
            }
            Err(e) => {
                self.reporter
                    .error(&format!("Error fetching MeSH terms for '{}': {}", term, e));
                vec![term.to_string()]
            }
        }
    }

    // Only the first (best ranked) match is used
    async fn try_lookup(&self, term: &str) -> Result<Option<Vec<String>>, LookupError> {
        let ids = self.source.search(term).await?;
        let Some(id) = ids.first() else {
            return Ok(None);
        };

        let descriptor = self.source.fetch_descriptor(id).await?;
        tracing::debug!(
            term,
            id = %id,
            ui = descriptor.ui.as_deref().unwrap_or("-"),
            name = %descriptor.name,
            "expanded term"
        );

        Ok(Some(descriptor.all_terms()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::testing::RecordingReporter;
    use crate::vocab::entrez::{Concept, Descriptor};
    use async_trait::async_trait;
    use std::collections::HashMap;

    // In-memory vocabulary: term -> ids, id -> descriptor.
    // Terms listed in `broken` fail with a service error.
    #[derive(Default)]
    struct StubTerminology {
        ids: HashMap<String, Vec<String>>,
        descriptors: HashMap<String, Descriptor>,
        broken: Vec<String>,
    }

    #[async_trait]
    impl Terminology for StubTerminology {
        async fn search(&self, term: &str) -> Result<Vec<String>, LookupError> {
            if self.broken.iter().any(|b| b == term) {
                return Err(LookupError::Service("quota exceeded".to_string()));
            }
            Ok(self.ids.get(term).cloned().unwrap_or_default())
        }

        async fn fetch_descriptor(&self, id: &str) -> Result<Descriptor, LookupError> {
            self.descriptors
                .get(id)
                .cloned()
                .ok_or_else(|| LookupError::Malformed(format!("no summary for id {}", id)))
        }
    }

    fn diabetes_vocabulary() -> StubTerminology {
        let mut stub = StubTerminology::default();
        stub.ids.insert(
            "diabetes".to_string(),
            vec!["68003920".to_string(), "68003924".to_string()],
        );
        stub.descriptors.insert(
            "68003920".to_string(),
            Descriptor {
                ui: Some("D003920".to_string()),
                name: "Diabetes Mellitus".to_string(),
                concepts: vec![Concept {
                    terms: vec!["Diabetes".to_string()],
                }],
            },
        );
        stub
    }

    #[test]
    fn test_parse_seed_terms() {
        let seeds = parse_seed_terms("cancer, diabetes ,hypertension");
        assert_eq!(seeds, vec!["cancer", "diabetes", "hypertension"]);
    }

    #[test]
    fn test_parse_seed_terms_drops_blanks_and_repeats() {
        let seeds = parse_seed_terms("cancer,, ,cancer,asthma,");
        assert_eq!(seeds, vec!["cancer", "asthma"]);
    }

    #[tokio::test]
    async fn test_lookup_uses_first_match() {
        let reporter = Arc::new(RecordingReporter::default());
        let expander = TermExpander::new(diabetes_vocabulary(), reporter.clone());

        let terms = expander.lookup_synonyms("diabetes").await;
        assert_eq!(terms, vec!["Diabetes Mellitus", "Diabetes"]);
        assert!(reporter.warnings().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_term_falls_back_with_warning() {
        let reporter = Arc::new(RecordingReporter::default());
        let expander = TermExpander::new(StubTerminology::default(), reporter.clone());

        let expanded = expander.expand(&["zzzznotaterm".to_string()]).await;
        assert_eq!(expanded, BTreeSet::from(["zzzznotaterm".to_string()]));

        let warnings = reporter.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("zzzznotaterm"));
    }

    #[tokio::test]
    async fn test_lookup_error_falls_back_with_error_event() {
        let reporter = Arc::new(RecordingReporter::default());
        let mut stub = diabetes_vocabulary();
        stub.broken.push("cancer".to_string());
        let expander = TermExpander::new(stub, reporter.clone());

        let expanded = expander
            .expand(&["cancer".to_string(), "diabetes".to_string()])
            .await;

        // The failing term is kept literally, the other one still expands
        assert!(expanded.contains("cancer"));
        assert!(expanded.contains("Diabetes Mellitus"));
        assert!(expanded.contains("Diabetes"));

        let errors = reporter.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("cancer"));
        assert!(errors[0].contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_missing_descriptor_falls_back() {
        let reporter = Arc::new(RecordingReporter::default());
        let mut stub = StubTerminology::default();
        stub.ids
            .insert("asthma".to_string(), vec!["68001249".to_string()]);
        let expander = TermExpander::new(stub, reporter.clone());

        let terms = expander.lookup_synonyms("asthma").await;
        assert_eq!(terms, vec!["asthma"]);
        assert_eq!(reporter.errors().len(), 1);
    }

    #[tokio::test]
    async fn test_expand_preserves_case() {
        let reporter = Arc::new(RecordingReporter::default());
        let expander = TermExpander::new(diabetes_vocabulary(), reporter);

        let expanded = expander.expand(&["diabetes".to_string()]).await;
        assert_eq!(
            expanded,
            BTreeSet::from(["Diabetes Mellitus".to_string(), "Diabetes".to_string()])
        );
    }

    #[tokio::test]
    async fn test_expand_reports_vocabulary_once() {
        let reporter = Arc::new(RecordingReporter::default());
        let expander = TermExpander::new(diabetes_vocabulary(), reporter.clone());

        let expanded = expander
            .expand(&["diabetes".to_string(), "zzzznotaterm".to_string()])
            .await;

        let events = reporter.expansions();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], expanded);
        assert!(events[0].contains("zzzznotaterm"));
    }
}
