//! Retrieval-augmented generation core.
//!
//! Generated text is chunked, embedded and kept in an in-memory
//! [`VectorStore`]; [`ContextualGenerator`] pulls the closest chunks into
//! each new prompt.

pub mod chunker;
pub mod generator;
pub mod similarity;
pub mod store;

pub use chunker::{chunk_text, ChunkOptions, DEFAULT_MAX_WORDS, DEFAULT_OVERLAP_WORDS};
pub use generator::{build_augmented_prompt, ContextualGenerator, DEFAULT_TIMEOUT};
pub use similarity::cosine_similarity;
pub use store::{ChunkEntry, ScoredChunk, VectorStore, DEFAULT_MIN_SIMILARITY, DEFAULT_TOP_K};
