use async_trait::async_trait;

use crate::services::google_ai::GoogleAiClient;

use super::errors::EmbeddingError;
use super::traits::{Embedder, Embedding};

/// Embeds text through the Gemini `embedContent` endpoint
pub struct GoogleAiEmbedder {
    client: GoogleAiClient,
}

impl GoogleAiEmbedder {
    /// Share a client, and its in-flight limit, with the generator
    pub fn from_client(client: GoogleAiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Embedder for GoogleAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        Ok(self.client.embed_text(text).await?)
    }

    fn model_name(&self) -> &str {
        &self.client.config().embedding_model
    }
}
