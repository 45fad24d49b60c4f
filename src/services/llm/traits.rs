use async_trait::async_trait;

use super::errors::LlmError;
use super::types::{GenerateRequest, GenerateResponse};

/// Text generation backend behind the contextual generator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError>;

    /// Model identifier, for logging
    fn model_name(&self) -> &str;
}
