//! Failures talking to the Gemini REST API.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GoogleAiError {
    #[error("Google AI rejected the API key: {message}")]
    Unauthorized { message: String },

    #[error("Google AI quota exhausted: {message}")]
    QuotaExhausted { message: String },

    #[error("Google AI is throttling requests: {message}")]
    Throttled {
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("Google AI rejected the request ({status}): {message}")]
    BadRequest { status: u16, message: String },

    #[error("Google AI unavailable ({status}): {message}")]
    Unavailable { status: u16, message: String },

    #[error("Could not reach Google AI: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("No reply from Google AI within {after_ms}ms")]
    TimedOut { after_ms: u64 },

    #[error("Response blocked by Google AI ({reason})")]
    Blocked { reason: String },

    #[error("Unusable reply from Google AI: {message}")]
    Malformed { message: String },

    #[error("Invalid Google AI settings: {message}")]
    Misconfigured { message: String },
}

impl GoogleAiError {
    /// Whether another attempt after a pause could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Throttled { .. } | Self::Unavailable { .. } | Self::Transport(_) | Self::TimedOut { .. }
        )
    }

    /// Pause the server asked for before the next attempt
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Throttled { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Classify a non-success reply from either endpoint.
    pub fn from_reply(status: StatusCode, retry_after: Option<Duration>, body: &str) -> Self {
        let message = api_message(body);
        let status = status.as_u16();
        match status {
            401 => Self::Unauthorized { message },
            403 if message.to_lowercase().contains("quota") => Self::QuotaExhausted { message },
            403 => Self::Unauthorized { message },
            429 => Self::Throttled {
                message,
                retry_after,
            },
            500..=599 => Self::Unavailable { status, message },
            _ => Self::BadRequest { status, message },
        }
    }
}

/// Google wraps failures as `{"error": {"message": ...}}`. Anything else is
/// reported as the raw body.
fn api_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
