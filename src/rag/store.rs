//! In-memory vector store over embedded chunks of prior output.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use super::chunker::ChunkOptions;
use super::similarity::cosine_similarity;
use crate::embedding::{Embedder, Embedding, EmbeddingError};

/// Number of chunks returned by a search when the caller has no preference.
pub const DEFAULT_TOP_K: usize = 3;

/// Retrieved chunks must score strictly above this.
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.70;

/// One embedded chunk. Immutable once stored.
#[derive(Debug, Clone)]
pub struct ChunkEntry {
    text: String,
    embedding: Embedding,
}

impl ChunkEntry {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }
}

/// A search hit with its cosine similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub text: String,
    pub score: f32,
}

#[derive(Debug, Default)]
struct Corpus {
    entries: Vec<ChunkEntry>,
    texts: HashSet<String>,
}

impl Corpus {
    fn contains(&self, text: &str) -> bool {
        self.texts.contains(text)
    }

    fn push(&mut self, entry: ChunkEntry) {
        if self.texts.insert(entry.text.clone()) {
            self.entries.push(entry);
        }
    }
}

/// Append-only store of embedded chunks with cosine-similarity lookup.
///
/// Only one `add_documents` call runs at a time. A call that arrives while
/// another is in flight is dropped rather than queued, and searches made
/// during an add return nothing.
pub struct VectorStore {
    embedder: Arc<dyn Embedder>,
    chunk_options: ChunkOptions,
    min_similarity: f32,
    corpus: RwLock<Corpus>,
    writer: Semaphore,
}

impl VectorStore {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            chunk_options: ChunkOptions::default(),
            min_similarity: DEFAULT_MIN_SIMILARITY,
            corpus: RwLock::new(Corpus::default()),
            writer: Semaphore::new(1),
        }
    }

    pub fn with_chunk_options(mut self, chunk_options: ChunkOptions) -> Self {
        self.chunk_options = chunk_options;
        self
    }

    pub fn with_min_similarity(mut self, min_similarity: f32) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    pub fn chunk_options(&self) -> ChunkOptions {
        self.chunk_options
    }

    pub fn min_similarity(&self) -> f32 {
        self.min_similarity
    }

    /// Chunk, embed and store `texts`.
    ///
    /// Returns immediately without storing anything if another add is in
    /// progress. Chunks whose text is already stored are skipped; a chunk
    /// whose embedding fails is logged and skipped while the rest continue.
    pub async fn add_documents<S: AsRef<str>>(&self, texts: &[S]) {
        let _permit = match self.writer.try_acquire() {
            Ok(permit) => permit,
            Err(_) => {
                warn!(
                    documents = texts.len(),
                    "Vector store busy, dropping documents"
                );
                return;
            }
        };

        let started = Instant::now();
        let mut added = 0usize;
        let mut duplicates = 0usize;
        let mut failed = 0usize;

        for (document, text) in texts.iter().enumerate() {
            for (chunk_index, chunk) in self.chunk_options.chunk(text.as_ref()).into_iter().enumerate()
            {
                if self.read_corpus().contains(&chunk) {
                    duplicates += 1;
                    continue;
                }

                match self.embedder.embed(&chunk).await {
                    Ok(embedding) => {
                        self.write_corpus().push(ChunkEntry {
                            text: chunk,
                            embedding,
                        });
                        added += 1;
                    }
                    Err(e) => {
                        error!(
                            document,
                            chunk = chunk_index,
                            error = %e,
                            "Failed to embed chunk, skipping"
                        );
                        failed += 1;
                    }
                }
            }
        }

        info!(
            documents = texts.len(),
            added,
            duplicates,
            failed,
            total = self.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Documents added to vector store"
        );
    }

    /// Embed a query with the same model used for stored chunks.
    pub async fn embed_query(&self, query: &str) -> Result<Embedding, EmbeddingError> {
        self.embedder.embed(query).await
    }

    /// Texts of the `k` stored chunks closest to `query_embedding`, best first.
    ///
    /// Only chunks scoring above the similarity threshold survive, so fewer
    /// than `k` (or none) may come back. Empty while an add is in flight.
    pub fn similarity_search(&self, query_embedding: &[f32], k: usize) -> Vec<String> {
        self.similarity_search_scored(query_embedding, k)
            .into_iter()
            .map(|hit| hit.text)
            .collect()
    }

    /// Same as [`similarity_search`](Self::similarity_search) but keeps the scores.
    pub fn similarity_search_scored(&self, query_embedding: &[f32], k: usize) -> Vec<ScoredChunk> {
        if self.is_busy() {
            debug!("Vector store busy, returning no context");
            return Vec::new();
        }

        let corpus = self.read_corpus();
        if corpus.entries.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(f32, &ChunkEntry)> = corpus
            .entries
            .iter()
            .map(|entry| {
                let score = cosine_similarity(query_embedding, &entry.embedding);
                (if score.is_finite() { score } else { 0.0 }, entry)
            })
            .collect();

        // Stable: equal scores keep insertion order
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        scored
            .into_iter()
            .take(k)
            .filter(|(score, _)| *score > self.min_similarity)
            .map(|(score, entry)| ScoredChunk {
                text: entry.text.clone(),
                score,
            })
            .collect()
    }

    /// Whether an add is currently in flight
    pub fn is_busy(&self) -> bool {
        self.writer.available_permits() == 0
    }

    pub fn len(&self) -> usize {
        self.read_corpus().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies of the stored chunk texts, in insertion order
    pub fn texts(&self) -> Vec<String> {
        self.read_corpus()
            .entries
            .iter()
            .map(|entry| entry.text.clone())
            .collect()
    }

    fn read_corpus(&self) -> RwLockReadGuard<'_, Corpus> {
        self.corpus.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_corpus(&self) -> RwLockWriteGuard<'_, Corpus> {
        self.corpus.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for VectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorStore")
            .field("entries", &self.len())
            .field("busy", &self.is_busy())
            .field("chunk_options", &self.chunk_options)
            .field("min_similarity", &self.min_similarity)
            .finish()
    }
}
