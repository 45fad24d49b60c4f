//! Text embedding providers.
//!
//! The vector store only sees the `Embedder` trait; the Google AI
//! implementation lives behind the `reqwest` feature.

mod errors;
#[cfg(feature = "reqwest")]
mod google_ai;
mod traits;

pub use errors::EmbeddingError;
#[cfg(feature = "reqwest")]
pub use google_ai::GoogleAiEmbedder;
pub use traits::{Embedder, Embedding, EMBEDDING_DIM};

#[cfg(test)]
pub use traits::MockEmbedder;
