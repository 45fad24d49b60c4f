#[cfg(feature = "reqwest")]
pub mod cli;
pub mod config;
pub mod embedding;
pub mod rag;
pub mod services;

pub mod env;
pub mod error;
pub mod logging;

pub use embedding::{Embedder, Embedding, EmbeddingError};
pub use error::{RagError, Result};
pub use logging::{init_logging, LoggingConfig};
pub use rag::{chunk_text, cosine_similarity, ChunkOptions, ContextualGenerator, VectorStore};
pub use services::llm::{GenerateRequest, GenerateResponse, LlmClient, LlmError};
