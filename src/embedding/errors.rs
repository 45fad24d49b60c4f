use thiserror::Error;

/// Failure to obtain a vector for one piece of text.
///
/// The vector store treats every variant as a soft, per-chunk failure.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Embedding service refused the credentials: {message}")]
    Unauthorized { message: String },

    #[error("Embedding service is throttling or out of quota: {message}")]
    Throttled { message: String },

    #[error("Text could not be embedded: {message}")]
    Rejected { message: String },

    #[error("Embedding service unavailable: {message}")]
    Unavailable { message: String },

    #[error("Embedding reply unusable: {message}")]
    Malformed { message: String },
}

#[cfg(feature = "reqwest")]
impl From<crate::services::google_ai::GoogleAiError> for EmbeddingError {
    fn from(err: crate::services::google_ai::GoogleAiError) -> Self {
        use crate::services::google_ai::GoogleAiError as G;

        let message = err.to_string();
        match err {
            G::Unauthorized { .. } | G::Misconfigured { .. } => {
                EmbeddingError::Unauthorized { message }
            }
            G::QuotaExhausted { .. } | G::Throttled { .. } => EmbeddingError::Throttled { message },
            G::BadRequest { .. } | G::Blocked { .. } => EmbeddingError::Rejected { message },
            G::Unavailable { .. } | G::Transport(_) | G::TimedOut { .. } => {
                EmbeddingError::Unavailable { message }
            }
            G::Malformed { .. } => EmbeddingError::Malformed { message },
        }
    }
}
