use reqwest::header::RETRY_AFTER;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::debug;

use super::errors::GoogleAiError;
use super::models::{
    EmbedContentRequest, EmbedContentResponse, GenerateContentRequest, GenerateContentResponse,
};
use super::retry::{with_retry, RetryPolicy};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";

/// Task hint sent with stored chunks and queries alike
const EMBEDDING_TASK_TYPE: &str = "SEMANTIC_SIMILARITY";

/// Requests in flight across generation and embedding
const MAX_IN_FLIGHT: usize = 15;

/// Connection settings shared by the generator and the embedder.
#[derive(Debug, Clone)]
pub struct GoogleAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub embedding_model: String,
    /// Per request, and the budget for all retries of one call
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: usize,
}

impl GoogleAiConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_GENERATION_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 3,
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_embedding_model(mut self, model: String) -> Self {
        self.embedding_model = model;
        self
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn validate(&self) -> Result<(), GoogleAiError> {
        let missing = if self.api_key.is_empty() {
            "API key"
        } else if self.base_url.is_empty() {
            "base URL"
        } else if self.model.is_empty() || self.embedding_model.is_empty() {
            "model name"
        } else {
            return Ok(());
        };

        Err(GoogleAiError::Misconfigured {
            message: format!("{missing} is required"),
        })
    }
}

/// Thin client for the two Gemini endpoints the session needs.
///
/// Clones share the HTTP pool and the in-flight limit.
#[derive(Clone)]
pub struct GoogleAiClient {
    config: GoogleAiConfig,
    http: Client,
    in_flight: Arc<Semaphore>,
}

impl GoogleAiClient {
    pub fn new(config: GoogleAiConfig) -> Result<Self, GoogleAiError> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GoogleAiError::Misconfigured {
                message: format!("cannot build HTTP client: {e}"),
            })?;

        Ok(Self {
            config,
            http,
            in_flight: Arc::new(Semaphore::new(MAX_IN_FLIGHT)),
        })
    }

    pub fn config(&self) -> &GoogleAiConfig {
        &self.config
    }

    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GoogleAiError> {
        self.call(&self.config.model, "generateContent", request).await
    }

    /// Embed a single text with the configured embedding model
    pub async fn embed_text(&self, text: &str) -> Result<Vec<f32>, GoogleAiError> {
        let request = EmbedContentRequest::new(&self.config.embedding_model, text)
            .with_task_type(EMBEDDING_TASK_TYPE);

        let response: EmbedContentResponse = self
            .call(&self.config.embedding_model, "embedContent", &request)
            .await?;
        response.into_values()
    }

    async fn call<B, R>(&self, model: &str, method: &str, body: &B) -> Result<R, GoogleAiError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let model = model.strip_prefix("models/").unwrap_or(model);
        let url = format!(
            "{}/models/{model}:{method}",
            self.config.base_url.trim_end_matches('/')
        );
        let endpoint = url.as_str();
        let policy = RetryPolicy::new(self.config.max_retries + 1, self.config.timeout);

        with_retry(&policy, || self.send(endpoint, body)).await
    }

    async fn send<B, R>(&self, url: &str, body: &B) -> Result<R, GoogleAiError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let _slot = self
            .in_flight
            .acquire()
            .await
            .map_err(|_| GoogleAiError::Misconfigured {
                message: "client has been shut down".to_string(),
            })?;

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        debug!(url, status = status.as_u16(), bytes = text.len(), "Google AI replied");

        if !status.is_success() {
            return Err(GoogleAiError::from_reply(status, retry_after, &text));
        }

        serde_json::from_str(&text).map_err(|e| GoogleAiError::Malformed {
            message: format!("cannot parse reply: {e}"),
        })
    }

    fn transport_error(&self, error: reqwest::Error) -> GoogleAiError {
        if error.is_timeout() {
            GoogleAiError::TimedOut {
                after_ms: self.config.timeout.as_millis() as u64,
            }
        } else {
            GoogleAiError::Transport(error)
        }
    }
}
