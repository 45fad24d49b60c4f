use thiserror::Error;

/// Why a generation call produced no text.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Generation service refused the credentials: {message}")]
    Unauthorized { message: String },

    #[error("Generation service is throttling or out of quota: {message}")]
    Throttled { message: String },

    #[error("Generation request rejected: {message}")]
    Rejected { message: String },

    #[error("Generation service unavailable: {message}")]
    Unavailable { message: String },

    #[error("Generation reply unusable: {message}")]
    Malformed { message: String },
}

impl LlmError {
    /// Whether the same prompt may succeed if sent again later
    pub fn is_retryable(&self) -> bool {
        matches!(self, LlmError::Throttled { .. } | LlmError::Unavailable { .. })
    }
}

#[cfg(feature = "reqwest")]
impl From<crate::services::google_ai::GoogleAiError> for LlmError {
    fn from(err: crate::services::google_ai::GoogleAiError) -> Self {
        use crate::services::google_ai::GoogleAiError as G;

        let message = err.to_string();
        match err {
            G::Unauthorized { .. } => LlmError::Unauthorized { message },
            G::QuotaExhausted { .. } | G::Throttled { .. } => LlmError::Throttled { message },
            G::BadRequest { .. } | G::Blocked { .. } | G::Misconfigured { .. } => {
                LlmError::Rejected { message }
            }
            G::Unavailable { .. } | G::Transport(_) | G::TimedOut { .. } => {
                LlmError::Unavailable { message }
            }
            G::Malformed { .. } => LlmError::Malformed { message },
        }
    }
}
