// src/vocab/mod.rs
// =============================================================================
// Vocabulary expansion.
//
// - entrez: NCBI E-utilities client for the MeSH database
// - expand: seed terms -> descriptor names + synonyms, with fallback
// =============================================================================

mod entrez;
mod expand;

pub use entrez::EntrezClient;
pub use expand::{parse_seed_terms, TermExpander};
