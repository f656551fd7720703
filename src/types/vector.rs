use crate::constants::VECTOR_SOURCE;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Embedding-backed record written to the vector store
#[derive(Debug, Clone, PartialEq)]
pub struct VectorItem {
    /// Content hash of `embedding_text`, set once the embedding is attached
    pub id: String,
    pub embedding_text: String,
    pub embedding_vector: Vec<f32>,
    pub metadata: VectorMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorMetadata {
    pub start: String,
    pub end: String,
    pub granularity: String,
    pub dimensions: Vec<String>,
    pub tags: Vec<String>,
    pub cost: f64,
}

impl VectorItem {
    pub fn new(embedding_text: String, metadata: VectorMetadata) -> Self {
        Self {
            id: String::new(),
            embedding_text,
            embedding_vector: Vec::new(),
            metadata,
        }
    }

    /// Attach the generated embedding and derive the stable id
    pub fn attach_embedding(&mut self, vector: Vec<f32>) {
        self.embedding_vector = vector;
        self.id = content_hash(&self.embedding_text);
    }
}

/// Hex SHA-256 of the text, so identical text always maps to the same id
pub fn content_hash(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Wire shape of one vector in an upsert request
#[derive(Debug, Clone, Serialize)]
pub struct UpsertVector<'a> {
    pub id: &'a str,
    pub values: &'a [f32],
    pub metadata: UpsertMetadata<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpsertMetadata<'a> {
    pub page_content: &'a str,
    pub source: &'static str,
    pub dimensions: Vec<&'a str>,
    pub start: &'a str,
    pub end: &'a str,
    pub cost: f64,
}

impl<'a> From<&'a VectorItem> for UpsertVector<'a> {
    fn from(item: &'a VectorItem) -> Self {
        let dimensions = item
            .metadata
            .dimensions
            .iter()
            .chain(item.metadata.tags.iter())
            .map(String::as_str)
            .collect();

        UpsertVector {
            id: &item.id,
            values: &item.embedding_vector,
            metadata: UpsertMetadata {
                page_content: &item.embedding_text,
                source: VECTOR_SOURCE,
                dimensions,
                start: &item.metadata.start,
                end: &item.metadata.end,
                cost: item.metadata.cost,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> VectorMetadata {
        VectorMetadata {
            start: "2024-01-01".to_string(),
            end: "2024-02-01".to_string(),
            granularity: "MONTHLY".to_string(),
            dimensions: vec!["SERVICE".to_string()],
            tags: vec!["team".to_string()],
            cost: 4.2,
        }
    }

    #[test]
    fn test_id_is_stable_content_hash() {
        let mut first = VectorItem::new("same text".to_string(), metadata());
        let mut second = VectorItem::new("same text".to_string(), metadata());
        assert!(first.id.is_empty());

        first.attach_embedding(vec![0.1, 0.2]);
        second.attach_embedding(vec![0.3, 0.4]);

        assert_eq!(first.id, second.id);
        assert_eq!(first.id.len(), 64);
        assert_ne!(first.id, content_hash("other text"));
    }

    #[test]
    fn test_upsert_payload_shape() {
        let mut item = VectorItem::new("EC2 cost".to_string(), metadata());
        item.attach_embedding(vec![1.0]);

        let payload = serde_json::to_value(UpsertVector::from(&item)).unwrap();
        assert_eq!(payload["values"], serde_json::json!([1.0]));
        assert_eq!(payload["metadata"]["page_content"], "EC2 cost");
        assert_eq!(payload["metadata"]["source"], VECTOR_SOURCE);
        assert_eq!(
            payload["metadata"]["dimensions"],
            serde_json::json!(["SERVICE", "team"])
        );
    }
}
