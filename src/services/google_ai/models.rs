//! Request and reply bodies for `generateContent` and `embedContent`.

use serde::{Deserialize, Serialize};

use super::errors::GoogleAiError;

/// Finish reasons that mean the text was withheld
const WITHHELD: &[&str] = &["SAFETY", "RECITATION", "BLOCKLIST", "PROHIBITED_CONTENT", "SPII"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part { text: text.into() }],
            role: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
}

impl GenerateContentRequest {
    /// Single-turn request carrying `prompt` as the user message
    pub fn new(prompt: impl Into<String>) -> Self {
        let mut content = Content::text(prompt);
        content.role = Some("user".to_string());
        Self {
            contents: vec![content],
            system_instruction: None,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(Content::text(instruction));
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    ///
    /// A blocked prompt or a withheld candidate is reported as
    /// [`GoogleAiError::Blocked`]; a reply with nothing to read as
    /// [`GoogleAiError::Malformed`].
    pub fn text(&self) -> Result<String, GoogleAiError> {
        if let Some(reason) = self.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_ref()) {
            return Err(GoogleAiError::Blocked {
                reason: reason.clone(),
            });
        }

        let candidate = self.candidates.first().ok_or_else(|| GoogleAiError::Malformed {
            message: "reply has no candidates".to_string(),
        })?;

        if let Some(reason) = candidate.finish_reason.as_deref() {
            if WITHHELD.contains(&reason) {
                return Err(GoogleAiError::Blocked {
                    reason: reason.to_string(),
                });
            }
        }

        let text: String = candidate
            .content
            .iter()
            .flat_map(|content| &content.parts)
            .map(|part| part.text.as_str())
            .collect();

        if text.is_empty() {
            return Err(GoogleAiError::Malformed {
                message: "candidate carries no text".to_string(),
            });
        }
        Ok(text)
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }
}

/// Body of a `models/{model}:embedContent` call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedContentRequest {
    pub model: String,
    pub content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
}

impl EmbedContentRequest {
    pub fn new(model: &str, text: impl Into<String>) -> Self {
        let model = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        };

        Self {
            model,
            content: Content::text(text),
            task_type: None,
        }
    }

    pub fn with_task_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = Some(task_type.into());
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbedContentResponse {
    pub embedding: ContentEmbedding,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentEmbedding {
    #[serde(default)]
    pub values: Vec<f32>,
}

impl EmbedContentResponse {
    /// The vector, provided it is non-empty and finite
    pub fn into_values(self) -> Result<Vec<f32>, GoogleAiError> {
        let values = self.embedding.values;
        if values.is_empty() {
            return Err(GoogleAiError::Malformed {
                message: "embedding has no values".to_string(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GoogleAiError::Malformed {
                message: "embedding has non-finite values".to_string(),
            });
        }
        Ok(values)
    }
}
