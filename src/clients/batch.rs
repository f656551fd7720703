use super::VectorStore;
use crate::error::{CexError, Result};
use crate::types::VectorItem;
use tracing::{debug, info};

/// Split items into consecutive batches of at most `batch_size`
pub fn split_into_batches<T>(items: &[T], batch_size: usize) -> Vec<&[T]> {
    items.chunks(batch_size.max(1)).collect()
}

/// Upsert items one batch at a time, summing the reported counts.
///
/// The first failing batch stops the loop; the error carries the count
/// accumulated from the batches written before it.
pub async fn upsert_batched(
    store: &dyn VectorStore,
    items: &[VectorItem],
    batch_size: usize,
) -> Result<usize> {
    let batches = split_into_batches(items, batch_size);
    let mut upserted = 0;

    for (index, batch) in batches.iter().enumerate() {
        match store.upsert(batch).await {
            Ok(count) => {
                debug!(batch = index, count, "upserted batch");
                upserted += count;
            }
            Err(source) => {
                return Err(CexError::PartialUpsert {
                    upserted,
                    failed_batch: index,
                    source: Box::new(source),
                });
            }
        }
    }

    info!(batches = batches.len(), upserted, "vector upsert complete");
    Ok(upserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::vector_store::MockVectorStore;
    use crate::error::{RenderFailure, RenderStage};
    use crate::types::VectorMetadata;

    fn items(count: usize) -> Vec<VectorItem> {
        (0..count)
            .map(|i| {
                VectorItem::new(
                    format!("item {}", i),
                    VectorMetadata {
                        start: "2024-01-01".to_string(),
                        end: "2024-02-01".to_string(),
                        granularity: "MONTHLY".to_string(),
                        dimensions: vec![],
                        tags: vec![],
                        cost: i as f64,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_split_into_batches() {
        let data: Vec<u32> = (0..53).collect();
        let sizes: Vec<usize> = split_into_batches(&data, 25).iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![25, 25, 3]);
    }

    #[test]
    fn test_split_exact_and_empty() {
        let data: Vec<u32> = (0..50).collect();
        assert_eq!(split_into_batches(&data, 25).len(), 2);

        let empty: Vec<u32> = Vec::new();
        assert!(split_into_batches(&empty, 25).is_empty());
    }

    #[tokio::test]
    async fn test_upsert_batched_sums_counts() {
        let mut store = MockVectorStore::new();
        store
            .expect_upsert()
            .times(3)
            .returning(|batch| Ok(batch.len()));

        let count = upsert_batched(&store, &items(53), 25).await.unwrap();
        assert_eq!(count, 53);
    }

    #[tokio::test]
    async fn test_upsert_batched_stops_at_failure() {
        let mut store = MockVectorStore::new();
        let mut seq = mockall::Sequence::new();
        store
            .expect_upsert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|batch| Ok(batch.len()));
        store
            .expect_upsert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(CexError::render(
                    RenderStage::Vector,
                    RenderFailure::Api {
                        status: 503,
                        body: "unavailable".to_string(),
                    },
                ))
            });

        let err = upsert_batched(&store, &items(60), 25).await.unwrap_err();
        match err {
            CexError::PartialUpsert {
                upserted,
                failed_batch,
                ..
            } => {
                assert_eq!(upserted, 25);
                assert_eq!(failed_batch, 1);
            }
            other => panic!("expected partial upsert, got {:?}", other),
        }
    }
}
