use async_trait::async_trait;
use ragctx::embedding::{Embedder, Embedding, EmbeddingError};
use ragctx::rag::{ContextualGenerator, VectorStore};
use ragctx::services::llm::{GenerateRequest, GenerateResponse, LlmClient, LlmError};
use ragctx::RagError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct TopicEmbedder;

#[async_trait]
impl Embedder for TopicEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let text = text.to_lowercase();
        let count = |words: &[&str]| words.iter().filter(|w| text.contains(*w)).count() as f32;
        Ok(vec![
            count(&["heart", "cardio", "blood"]),
            count(&["supply", "freight", "warehouse"]),
            0.1,
        ])
    }

    fn model_name(&self) -> &str {
        "topic"
    }
}

/// Replies from a script and records every prompt it receives
struct ScriptedLlm {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        self.prompts.lock().unwrap().push(request.prompt);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::Malformed {
                message: "script exhausted".to_string(),
            })?;
        Ok(GenerateResponse::new(reply))
    }

    fn model_name(&self) -> &str {
        "scripted-v1"
    }
}

struct SlowLlm;

#[async_trait]
impl LlmClient for SlowLlm {
    async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(GenerateResponse::new("too late"))
    }

    fn model_name(&self) -> &str {
        "slow-v1"
    }
}

#[tokio::test]
async fn test_later_prompts_see_earlier_outputs() {
    let llm = Arc::new(ScriptedLlm::new(&[
        "Regular cardio exercise keeps the heart strong and blood pressure low.",
        "Walking daily is a simple heart habit.",
        "Freight delays ripple through the warehouse.",
    ]));
    let store = Arc::new(VectorStore::new(Arc::new(TopicEmbedder)));
    let generator = ContextualGenerator::new(llm.clone(), store.clone());

    generator.generate("Write about heart health").await.unwrap();
    generator.generate("More heart tips please").await.unwrap();
    generator.generate("Explain supply problems").await.unwrap();

    let prompts = llm.prompts();
    assert_eq!(prompts[0], "Write about heart health");

    assert!(prompts[1].contains("Regular cardio exercise"));
    assert!(prompts[1].ends_with("More heart tips please"));

    // Nothing about supply chains is stored yet
    assert_eq!(prompts[2], "Explain supply problems");

    assert_eq!(store.len(), 3);
}

#[tokio::test]
async fn test_generation_timeout() {
    let store = Arc::new(VectorStore::new(Arc::new(TopicEmbedder)));
    let generator = ContextualGenerator::new(Arc::new(SlowLlm), store.clone())
        .with_timeout(Duration::from_millis(20));

    let err = generator.generate("Write about heart health").await.unwrap_err();

    assert!(matches!(err, RagError::Timeout { timeout_ms: 20 }));
    assert!(err.is_retryable());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_system_prompt_forwarded() {
    struct RecordingLlm(Mutex<Option<GenerateRequest>>);

    #[async_trait]
    impl LlmClient for RecordingLlm {
        async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
            *self.0.lock().unwrap() = Some(request);
            Ok(GenerateResponse::new("ok"))
        }


        fn model_name(&self) -> &str {
            "recording-v1"
        }
    }

    let llm = Arc::new(RecordingLlm(Mutex::new(None)));
    let store = Arc::new(VectorStore::new(Arc::new(TopicEmbedder)));
    let generator = ContextualGenerator::new(llm.clone(), store)
        .with_system_prompt("You write for cardiologists.");

    generator.generate("Summarise").await.unwrap();

    let request = llm.0.lock().unwrap().take().unwrap();
    assert_eq!(
        request.system_prompt.as_deref(),
        Some("You write for cardiologists.")
    );
}
