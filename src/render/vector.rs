use super::{ReportInput, Renderer};
use crate::binning::classify;
use crate::clients::{EmbeddingProvider, VectorStore, upsert_batched};
use crate::constants::UPSERT_BATCH_SIZE;
use crate::error::{CexError, RenderFailure, RenderStage, Result};
use crate::types::{GroupDefinition, Service, VectorItem, VectorMetadata};
use async_trait::async_trait;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::info;

/// Embeds each service as a sentence and upserts it into a vector index
pub struct VectorRenderer {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    batch_size: usize,
}

impl VectorRenderer {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            store,
            batch_size: UPSERT_BATCH_SIZE,
        }
    }

    /// Embed every item in one call, then upsert in fixed-size batches.
    /// Returns the summed upsert count.
    pub async fn embed_and_upsert(&self, mut items: Vec<VectorItem>) -> Result<usize> {
        if items.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = items.iter().map(|i| i.embedding_text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;

        if vectors.len() != items.len() {
            return Err(CexError::render(
                RenderStage::Vector,
                RenderFailure::EmbeddingCount {
                    expected: items.len(),
                    actual: vectors.len(),
                },
            ));
        }

        for (item, vector) in items.iter_mut().zip(vectors) {
            item.attach_embedding(vector);
        }

        upsert_batched(self.store.as_ref(), &items, self.batch_size).await
    }
}

#[async_trait]
impl Renderer for VectorRenderer {
    type Output = Vec<VectorItem>;

    fn transform(&self, input: &ReportInput) -> Result<Vec<VectorItem>> {
        let groups = input.group_definitions();
        let granularity = input.granularity.to_string();

        Ok(input
            .sorted()
            .par_iter()
            .map(|service| {
                VectorItem::new(
                    describe(service, &groups, &granularity),
                    VectorMetadata {
                        start: service.start.clone(),
                        end: service.end.clone(),
                        granularity: granularity.clone(),
                        dimensions: input.dimensions.clone(),
                        tags: input.tags.clone(),
                        cost: service.primary_amount(),
                    },
                )
            })
            .collect())
    }

    async fn render(&self, items: Vec<VectorItem>) -> Result<()> {
        let total = items.len();
        let upserted = self.embed_and_upsert(items).await?;
        info!(items = total, upserted, "wrote vector report");
        Ok(())
    }
}

/// Plain-language description of one service, the text that gets embedded
fn describe(service: &Service, groups: &[GroupDefinition], granularity: &str) -> String {
    let mut text = format!(
        "From {} to {} at {} granularity",
        service.start, service.end, granularity
    );

    for (group, key) in groups.iter().zip(&service.keys) {
        if group.is_tag() {
            let value = tag_value(&group.key, key);
            text.push_str(&format!(", the {} tag was {}", group.key, value));
        } else {
            text.push_str(&format!(", the {} was {}", group.key, key));
        }
    }

    let metrics: Vec<String> = service
        .metrics
        .iter()
        .map(|m| format!("{} was {} {}", m.name, classify(m.amount_float), m.unit))
        .collect();

    if metrics.is_empty() {
        text.push('.');
    } else {
        text.push_str(&format!(": {}.", metrics.join("; ")));
    }
    text
}

// Tag group keys arrive as `key$value`; an empty value means untagged
fn tag_value<'a>(tag_key: &str, raw: &'a str) -> &'a str {
    let value = raw
        .strip_prefix(tag_key)
        .and_then(|rest| rest.strip_prefix('$'))
        .unwrap_or(raw);
    if value.is_empty() { "untagged" } else { value }
}
