//! Word-window chunking for embedding.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_WORDS: usize = 100;
pub const DEFAULT_OVERLAP_WORDS: usize = 20;

/// Window sizes used when splitting a document into chunks.
///
/// `overlap_words` must be smaller than `max_words`; otherwise the window
/// never advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkOptions {
    pub max_words: usize,
    pub overlap_words: usize,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            max_words: DEFAULT_MAX_WORDS,
            overlap_words: DEFAULT_OVERLAP_WORDS,
        }
    }
}

impl ChunkOptions {
    pub fn new(max_words: usize, overlap_words: usize) -> Self {
        Self {
            max_words,
            overlap_words,
        }
    }

    pub fn chunk(&self, text: &str) -> Vec<String> {
        chunk_text(text, self.max_words, self.overlap_words)
    }
}

/// Split `text` into overlapping windows of at most `max_words` words.
///
/// `#` markers are stripped before counting words. A document that fits in a
/// single window is returned untouched, markers and formatting included.
/// Longer documents are re-joined with single spaces, one window every
/// `max_words - overlap_words` words, stopping at the first window that
/// reaches the end of the document.
///
/// Callers must pass `overlap_words < max_words`. Debug builds panic
/// otherwise; release builds get a zero step and the call never terminates.
pub fn chunk_text(text: &str, max_words: usize, overlap_words: usize) -> Vec<String> {
    debug_assert!(
        overlap_words < max_words,
        "overlap_words ({overlap_words}) must be smaller than max_words ({max_words})"
    );

    let stripped = text.replace('#', "");
    let words: Vec<&str> = stripped.split_whitespace().collect();

    if words.len() <= max_words {
        return vec![text.to_string()];
    }

    let step = max_words.saturating_sub(overlap_words);
    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + max_words).min(words.len());
        chunks.push(words[start..end].join(" "));

        // Stop at the window reaching the end; no trailing remainder window
        // follows it. Kept for compatibility; likely unintended.
        if end >= words.len() {
            break;
        }
        start += step;
    }

    chunks
}
