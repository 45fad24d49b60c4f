//! Retrieve, augment, generate and remember.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::store::{ScoredChunk, VectorStore, DEFAULT_TOP_K};
use crate::error::{RagError, Result};
use crate::services::llm::{GenerateRequest, LlmClient};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const CONTEXT_HEADER: &str = "Relevant context from earlier in this session:";
const CONTEXT_FOOTER: &str = "End of context.";

/// Wraps an [`LlmClient`] so every prompt is enriched with similar earlier
/// output and every answer is fed back into the store.
pub struct ContextualGenerator {
    llm: Arc<dyn LlmClient>,
    store: Arc<VectorStore>,
    top_k: usize,
    timeout: Duration,
    system_prompt: Option<String>,
    remember_outputs: bool,
}

impl ContextualGenerator {
    pub fn new(llm: Arc<dyn LlmClient>, store: Arc<VectorStore>) -> Self {
        Self {
            llm,
            store,
            top_k: DEFAULT_TOP_K,
            timeout: DEFAULT_TIMEOUT,
            system_prompt: None,
            remember_outputs: true,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    /// Skip storing generated text. Retrieval still happens.
    pub fn without_memory(mut self) -> Self {
        self.remember_outputs = false;
        self
    }

    pub fn store(&self) -> &Arc<VectorStore> {
        &self.store
    }

    /// Generate a response to `prompt`, drawing on earlier outputs as context.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(RagError::validation("prompt", "must not be empty"));
        }

        let started = Instant::now();
        let context = self.retrieve_context(prompt).await;
        let augmented = build_augmented_prompt(prompt, &context);

        let mut request = GenerateRequest::new(augmented);
        if let Some(system_prompt) = &self.system_prompt {
            request = request.with_system_prompt(system_prompt.as_str());
        }

        debug!(
            model = self.llm.model_name(),
            context_chunks = context.len(),
            prompt_chars = request.prompt.len(),
            "Sending generation request"
        );

        let response = tokio::time::timeout(self.timeout, self.llm.generate(request))
            .await
            .map_err(|_| RagError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            })??;

        if self.remember_outputs {
            self.store
                .add_documents(std::slice::from_ref(&response.text))
                .await;
        }

        info!(
            context_chunks = context.len(),
            output_chars = response.text.len(),
            stored_chunks = self.store.len(),
            usage = ?response.usage,
            duration_ms = started.elapsed().as_millis() as u64,
            "Generation completed"
        );

        Ok(response.text)
    }

    async fn retrieve_context(&self, prompt: &str) -> Vec<ScoredChunk> {
        if self.store.is_empty() {
            return Vec::new();
        }

        match self.store.embed_query(prompt).await {
            Ok(query) => self.store.similarity_search_scored(&query, self.top_k),
            Err(e) => {
                warn!(error = %e, "Failed to embed prompt, generating without context");
                Vec::new()
            }
        }
    }
}

/// Prefix `prompt` with the retrieved chunks, or return it unchanged when
/// there are none.
pub fn build_augmented_prompt(prompt: &str, context: &[ScoredChunk]) -> String {
    if context.is_empty() {
        return prompt.to_string();
    }

    let mut augmented = String::from(CONTEXT_HEADER);
    augmented.push_str("\n\n");
    for (i, chunk) in context.iter().enumerate() {
        augmented.push_str(&format!("[{}] {}\n\n", i + 1, chunk.text));
    }
    augmented.push_str(CONTEXT_FOOTER);
    augmented.push_str("\n\n");
    augmented.push_str(prompt);
    augmented
}
