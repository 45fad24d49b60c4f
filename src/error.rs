use thiserror::Error;

use crate::services::llm::LlmError;

/// Why a contextual generation produced no text
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Generation failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Generation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },
}

impl RagError {
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether resubmitting the same prompt later may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            RagError::Llm(err) => err.is_retryable(),
            RagError::Timeout { .. } => true,
            RagError::Validation { .. } => false,
        }
    }

    /// Short label used as the `category` log field
    pub fn category(&self) -> &'static str {
        match self {
            RagError::Llm(_) => "generation",
            RagError::Timeout { .. } => "timeout",
            RagError::Validation { .. } => "validation",
        }
    }
}

pub type Result<T> = std::result::Result<T, RagError>;
