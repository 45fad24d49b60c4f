//! Embedding provider trait

use async_trait::async_trait;

use super::errors::EmbeddingError;

/// Embedding vector produced by a provider.
pub type Embedding = Vec<f32>;

/// Dimensionality of `text-embedding-004` vectors.
pub const EMBEDDING_DIM: usize = 768;

/// Provider-agnostic text embedding.
///
/// Implementations turn one string into one vector. The vector store calls
/// this once per new chunk and never concurrently for the same store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Produce the embedding vector for `text`
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;

    /// Model identifier, for logging
    fn model_name(&self) -> &str;
}
