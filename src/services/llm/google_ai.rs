use async_trait::async_trait;

use crate::services::google_ai::{GenerateContentRequest, GoogleAiClient};

use super::errors::LlmError;
use super::traits::LlmClient;
use super::types::{GenerateRequest, GenerateResponse, TokenUsage};

/// Gemini `generateContent` as an [`LlmClient`]
pub struct GoogleAiAdapter {
    client: GoogleAiClient,
}

impl GoogleAiAdapter {
    /// Share a client, and its in-flight limit, with the embedder
    pub fn from_client(client: GoogleAiClient) -> Self {
        Self { client }
    }

    fn to_wire(request: GenerateRequest) -> GenerateContentRequest {
        let wire = GenerateContentRequest::new(request.prompt);
        match request.system_prompt {
            Some(system_prompt) => wire.with_system_instruction(system_prompt),
            None => wire,
        }
    }
}

#[async_trait]
impl LlmClient for GoogleAiAdapter {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let reply = self.client.generate_content(&Self::to_wire(request)).await?;

        Ok(GenerateResponse {
            text: reply.text()?,
            usage: reply.usage_metadata.map(|usage| TokenUsage {
                prompt_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            }),
            finish_reason: reply.finish_reason().map(str::to_string),
        })
    }

    fn model_name(&self) -> &str {
        &self.client.config().model
    }
}
