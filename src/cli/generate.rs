use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

use crate::config::{self, Config};
use crate::embedding::{Embedder, GoogleAiEmbedder};
use crate::logging::log_error;
use crate::rag::{ContextualGenerator, VectorStore};
use crate::services::google_ai::{GoogleAiClient, GoogleAiConfig};
use crate::services::llm::{GoogleAiAdapter, LlmClient};

/// Run `prompts` in order through a single session, printing each output
pub async fn handle_generate_command(
    prompts: Vec<String>,
    system: Option<String>,
    top_k: Option<usize>,
    no_memory: bool,
) -> Result<()> {
    let settings = Config::load()?;
    let generator = build_generator(&settings, system, top_k, no_memory)?;

    let total = prompts.len();
    let mut failures = 0usize;

    for (index, prompt) in prompts.iter().enumerate() {
        match generator.generate(prompt).await {
            Ok(text) => {
                if total > 1 {
                    println!("--- [{}/{}] ---", index + 1, total);
                }
                println!("{text}");
                println!();
            }
            Err(e) => {
                log_error(&e, e.category());
                let hint = if e.is_retryable() {
                    " (temporary, try again later)"
                } else {
                    ""
                };
                eprintln!("Prompt {} of {} failed: {e}{hint}", index + 1, total);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {total} prompts failed");
    }

    Ok(())
}

fn build_generator(
    settings: &Config,
    system: Option<String>,
    top_k: Option<usize>,
    no_memory: bool,
) -> Result<ContextualGenerator> {
    let api_key = config::get_google_ai_api_key()?.context(
        "Google AI API key not configured. Set GOOGLE_AI_API_KEY or run `ragctx config set google-ai-api-key <KEY>`",
    )?;

    let mut client_config = GoogleAiConfig::new(api_key);
    if let Some(model) = &settings.models.generation {
        client_config = client_config.with_model(model.clone());
    }
    if let Some(model) = &settings.models.embedding {
        client_config = client_config.with_embedding_model(model.clone());
    }

    let client = GoogleAiClient::new(client_config).context("Failed to create Google AI client")?;

    let embedder = Arc::new(GoogleAiEmbedder::from_client(client.clone()));
    let llm = Arc::new(GoogleAiAdapter::from_client(client));
    debug!(
        embedding_model = embedder.model_name(),
        generation_model = llm.model_name(),
        "Session ready"
    );

    let store = Arc::new(
        VectorStore::new(embedder)
            .with_chunk_options(settings.chunk_options())
            .with_min_similarity(settings.min_similarity()),
    );

    let mut generator = ContextualGenerator::new(llm, store)
        .with_top_k(top_k.unwrap_or_else(|| settings.top_k()))
        .with_timeout(settings.generation_timeout());
    if let Some(system) = system {
        generator = generator.with_system_prompt(system);
    }
    if no_memory {
        generator = generator.without_memory();
    }

    Ok(generator)
}
