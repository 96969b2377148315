// src/vocab/entrez.rs
// =============================================================================
// This module talks to NCBI E-utilities to look up MeSH descriptors.
//
// Two requests per term:
// 1. esearch.fcgi  - "which MeSH records match 'diabetes'?" -> list of IDs
// 2. esummary.fcgi - "give me the names for record 68003920" -> descriptor
//
// Both are asked for JSON (retmode=json) so serde can decode them.
//
// NCBI asks every client to send a `tool` name and a contact `email`.
// They come from LookupConfig, never from global state.
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

use crate::config::LookupConfig;
use crate::error::LookupError;

const MESH_DB: &str = "mesh";

/// A MeSH descriptor: the preferred name plus its concepts' terms
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    /// MeSH unique ID, e.g. "D003920"
    pub ui: Option<String>,
    /// Preferred descriptor name, e.g. "Diabetes Mellitus"
    pub name: String,
    pub concepts: Vec<Concept>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Concept {
    pub terms: Vec<String>,
}

impl Descriptor {
    /// The descriptor name followed by every term of every concept
    pub fn all_terms(&self) -> Vec<String> {
        std::iter::once(self.name.clone())
            .chain(self.concepts.iter().flat_map(|c| c.terms.iter().cloned()))
            .collect()
    }
}

/// A controlled vocabulary that can be searched and read
#[async_trait]
pub trait Terminology: Send + Sync {
    /// IDs of records matching `term`, best match first
    async fn search(&self, term: &str) -> Result<Vec<String>, LookupError>;

    /// Full descriptor for one record ID
    async fn fetch_descriptor(&self, id: &str) -> Result<Descriptor, LookupError>;
}

/// E-utilities client for the MeSH database
pub struct EntrezClient {
    client: Client,
    config: LookupConfig,
}

impl EntrezClient {
    pub fn new(config: LookupConfig) -> Result<Self, LookupError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), name)
    }

    // Query parameters every E-utilities request carries
    fn common_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("db", MESH_DB.to_string()),
            ("retmode", "json".to_string()),
            ("tool", self.config.tool.clone()),
            ("email", self.config.email.clone()),
        ];
        if let Some(key) = &self.config.api_key {
            params.push(("api_key", key.clone()));
        }
        params
    }
}

#[async_trait]
impl Terminology for EntrezClient {
    async fn search(&self, term: &str) -> Result<Vec<String>, LookupError> {
        let mut params = self.common_params();
        params.push(("term", term.to_string()));
        params.push(("retmax", "1".to_string()));

        let envelope: SearchEnvelope = self
            .client
            .get(self.endpoint("esearch.fcgi"))
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(message) = envelope.error {
            return Err(LookupError::Service(message));
        }

        let result = envelope
            .esearchresult
            .ok_or_else(|| LookupError::Malformed("missing esearchresult".to_string()))?;

        if let Some(message) = result.error {
            return Err(LookupError::Service(message));
        }

        tracing::debug!(term, ids = ?result.idlist, "esearch finished");
        Ok(result.idlist)
    }

    async fn fetch_descriptor(&self, id: &str) -> Result<Descriptor, LookupError> {
        let mut params = self.common_params();
        params.push(("id", id.to_string()));

        let envelope: SummaryEnvelope = self
            .client
            .get(self.endpoint("esummary.fcgi"))
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(message) = envelope.error {
            return Err(LookupError::Service(message));
        }

        let mut result = envelope
            .result
            .ok_or_else(|| LookupError::Malformed("missing result".to_string()))?;

        let record = result
            .remove(id)
            .ok_or_else(|| LookupError::Malformed(format!("no summary for id {}", id)))?;

        let summary: MeshSummary = serde_json::from_value(record)
            .map_err(|e| LookupError::Malformed(format!("summary for id {}: {}", id, e)))?;

        summary.into_descriptor(id)
    }
}

// --- wire types --------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    esearchresult: Option<SearchResult>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    idlist: Vec<String>,
    #[serde(rename = "ERROR")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    // Keys are record IDs, plus a "uids" list we don't need
    result: Option<HashMap<String, serde_json::Value>>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MeshSummary {
    #[serde(default)]
    ds_meshui: Option<String>,
    #[serde(default)]
    ds_meshterms: Vec<String>,
}

impl MeshSummary {
    // The first entry of ds_meshterms is the preferred descriptor name; the
    // summary doesn't group the rest, so they form a single concept
    fn into_descriptor(self, id: &str) -> Result<Descriptor, LookupError> {
        let mut terms = self.ds_meshterms.into_iter();
        let name = terms
            .next()
            .ok_or_else(|| LookupError::Malformed(format!("descriptor {} has no terms", id)))?;

        let synonyms: Vec<String> = terms.collect();
        let concepts = if synonyms.is_empty() {
            Vec::new()
        } else {
            vec![Concept { terms: synonyms }]
        };

        Ok(Descriptor {
            ui: self.ds_meshui,
            name,
            concepts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> EntrezClient {
        let config = LookupConfig::new("tester@example.org").with_base_url(server.uri());
        EntrezClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_search_returns_ids() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/esearch.fcgi"))
            .and(query_param("db", "mesh"))
            .and(query_param("term", "diabetes"))
            .and(query_param("email", "tester@example.org"))
            .and(query_param("tool", "term-crawler"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "header": {"type": "esearch", "version": "0.3"},
                "esearchresult": {"count": "12", "retmax": "1", "idlist": ["68003920"]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ids = client_for(&server).search("diabetes").await.unwrap();
        assert_eq!(ids, vec!["68003920".to_string()]);
    }

    #[tokio::test]
    async fn test_search_without_matches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/esearch.fcgi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "esearchresult": {"count": "0", "retmax": "0", "idlist": []}
            })))
            .mount(&server)
            .await;

        let ids = client_for(&server).search("zzzznotaterm").await.unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_service_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/esearch.fcgi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": "API rate limit exceeded"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).search("cancer").await.unwrap_err();
        assert!(matches!(err, LookupError::Service(ref m) if m.contains("rate limit")));
    }

    #[tokio::test]
    async fn test_http_failure_is_lookup_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/esearch.fcgi"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).search("cancer").await.unwrap_err();
        assert!(matches!(err, LookupError::Http(_)));
    }

    #[tokio::test]
    async fn test_fetch_descriptor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/esummary.fcgi"))
            .and(query_param("id", "68009369"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {
                    "uids": ["68009369"],
                    "68009369": {
                        "uid": "68009369",
                        "ds_meshui": "D009369",
                        "ds_meshterms": ["Neoplasms", "Tumors", "Cancer"]
                    }
                }
            })))
            .mount(&server)
            .await;

        let descriptor = client_for(&server).fetch_descriptor("68009369").await.unwrap();
        assert_eq!(descriptor.name, "Neoplasms");
        assert_eq!(descriptor.ui.as_deref(), Some("D009369"));
        assert_eq!(
            descriptor.all_terms(),
            vec!["Neoplasms", "Tumors", "Cancer"]
        );
    }

    #[tokio::test]
    async fn test_descriptor_with_only_a_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/esummary.fcgi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {"uids": ["7"], "7": {"uid": "7", "ds_meshterms": ["Asthma"]}}
            })))
            .mount(&server)
            .await;

        let descriptor = client_for(&server).fetch_descriptor("7").await.unwrap();
        assert!(descriptor.concepts.is_empty());
        assert_eq!(descriptor.all_terms(), vec!["Asthma"]);
    }

    #[tokio::test]
    async fn test_descriptor_without_terms_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/esummary.fcgi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {"uids": ["1"], "1": {"uid": "1", "ds_meshterms": []}}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_descriptor("1").await.unwrap_err();
        assert!(matches!(err, LookupError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_missing_record_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/esummary.fcgi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {"uids": []}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_descriptor("42").await.unwrap_err();
        assert!(matches!(err, LookupError::Malformed(_)));
    }
}
