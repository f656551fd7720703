pub mod batch;
pub mod embedding;
pub mod vector_store;

pub use batch::{split_into_batches, upsert_batched};
pub use embedding::{EmbeddingProvider, OpenAIProvider};
pub use vector_store::{PineconeStore, VectorStore};
