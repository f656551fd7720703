use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::VectorStoreConfig;
use crate::error::{CexError, RenderFailure, RenderStage, Result};
use crate::types::{UpsertVector, VectorItem};

/// Similarity-search index accepting embedded items
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Write one batch, returning how many vectors the store reports upserted
    async fn upsert(&self, batch: &[VectorItem]) -> Result<usize>;
}

/// Pinecone data-plane client for a single index
pub struct PineconeStore {
    client: Client,
    host: String,
    api_key: String,
    namespace: Option<String>,
}

impl PineconeStore {
    pub fn new(config: &VectorStoreConfig) -> Self {
        let host = config.index_host.trim_end_matches('/');
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };

        Self {
            client: Client::new(),
            host,
            api_key: config.index_api_key.clone(),
            namespace: config.namespace.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<UpsertVector<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: usize,
}

fn vector_error(source: impl Into<RenderFailure>) -> CexError {
    CexError::render(RenderStage::Vector, source)
}

#[async_trait]
impl VectorStore for PineconeStore {
    async fn upsert(&self, batch: &[VectorItem]) -> Result<usize> {
        let request = UpsertRequest {
            vectors: batch.iter().map(UpsertVector::from).collect(),
            namespace: self.namespace.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/vectors/upsert", self.host))
            .header("Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(vector_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(vector_error(RenderFailure::Api { status, body }));
        }

        let upsert_response: UpsertResponse = response.json().await.map_err(vector_error)?;
        Ok(upsert_response.upserted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_gets_scheme() {
        let config = VectorStoreConfig::new("billing-abc.svc.pinecone.io/", "key", "oa");
        let store = PineconeStore::new(&config);
        assert_eq!(store.host, "https://billing-abc.svc.pinecone.io");

        let config = VectorStoreConfig::new("http://localhost:5080", "key", "oa");
        assert_eq!(PineconeStore::new(&config).host, "http://localhost:5080");
    }

    #[test]
    fn test_upsert_response_parsing() {
        let parsed: UpsertResponse = serde_json::from_str(r#"{"upsertedCount": 25}"#).unwrap();
        assert_eq!(parsed.upserted_count, 25);
    }
}
