//! Configuration file management for ragctx
//!
//! Values live in ~/.ragctx/config.toml. Anything left unset falls back to
//! the built-in defaults, and a few values can be overridden by environment
//! variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::env::{apis as env_apis, generation as env_generation};
use crate::rag::{ChunkOptions, DEFAULT_MIN_SIMILARITY, DEFAULT_TIMEOUT, DEFAULT_TOP_K};

/// Keys accepted by `get`/`set`/`unset`, in display order
pub const CONFIG_KEYS: &[&str] = &[
    "google-ai-api-key",
    "generation-model",
    "embedding-model",
    "max-words",
    "overlap-words",
    "top-k",
    "timeout-secs",
    "min-similarity",
];

/// Configuration structure matching config.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub rag: RagConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_ai_api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ModelsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RagConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_words: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap_words: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_similarity: Option<f32>,
}

impl Config {
    /// Get the config file path (~/.ragctx/config.toml)
    pub fn get_config_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Could not find home directory")?;
        Ok(home_dir.join(".ragctx").join("config.toml"))
    }

    /// Load configuration from the default location
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", config_path.display()))?;

        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        // Owner read/write only, the file may hold an API key
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(config_path, permissions).with_context(|| {
                format!(
                    "Failed to set permissions on config file: {}",
                    config_path.display()
                )
            })?;
        }

        Ok(())
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        let options = self.chunk_options();
        if options.max_words == 0 {
            anyhow::bail!("max-words must be greater than 0");
        }
        if options.overlap_words >= options.max_words {
            anyhow::bail!(
                "overlap-words ({}) must be smaller than max-words ({})",
                options.overlap_words,
                options.max_words
            );
        }
        if self.rag.top_k == Some(0) {
            anyhow::bail!("top-k must be greater than 0");
        }
        if self.rag.timeout_secs == Some(0) {
            anyhow::bail!("timeout-secs must be greater than 0");
        }
        if let Some(threshold) = self.rag.min_similarity {
            if !(-1.0..=1.0).contains(&threshold) {
                anyhow::bail!("min-similarity must be between -1.0 and 1.0");
            }
        }
        Ok(())
    }

    pub fn chunk_options(&self) -> ChunkOptions {
        let defaults = ChunkOptions::default();
        ChunkOptions::new(
            self.rag.max_words.unwrap_or(defaults.max_words),
            self.rag.overlap_words.unwrap_or(defaults.overlap_words),
        )
    }

    pub fn top_k(&self) -> usize {
        self.rag.top_k.unwrap_or(DEFAULT_TOP_K)
    }

    pub fn min_similarity(&self) -> f32 {
        self.rag.min_similarity.unwrap_or(DEFAULT_MIN_SIMILARITY)
    }

    /// Generation timeout with priority: environment variable > config file > default
    pub fn generation_timeout(&self) -> Duration {
        if let Ok(raw) = std::env::var(env_generation::TIMEOUT) {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => return Duration::from_secs(secs),
                _ => tracing::warn!(
                    value = %raw,
                    "Ignoring invalid {}",
                    env_generation::TIMEOUT
                ),
            }
        }

        self.rag
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Get a config value by key
    pub fn get(&self, key: &str) -> Option<String> {
        match normalize_key(key).as_str() {
            "google-ai-api-key" => self.api.google_ai_api_key.clone(),
            "generation-model" => self.models.generation.clone(),
            "embedding-model" => self.models.embedding.clone(),
            "max-words" => self.rag.max_words.map(|v| v.to_string()),
            "overlap-words" => self.rag.overlap_words.map(|v| v.to_string()),
            "top-k" => self.rag.top_k.map(|v| v.to_string()),
            "timeout-secs" => self.rag.timeout_secs.map(|v| v.to_string()),
            "min-similarity" => self.rag.min_similarity.map(|v| v.to_string()),
            _ => None,
        }
    }

    /// Set a config value by key
    ///
    /// The change is rejected, leaving `self` untouched, if it would make the
    /// configuration invalid.
    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        let mut updated = self.clone();
        match normalize_key(key).as_str() {
            "google-ai-api-key" => updated.api.google_ai_api_key = Some(value),
            "generation-model" => updated.models.generation = Some(value),
            "embedding-model" => updated.models.embedding = Some(value),
            "max-words" => updated.rag.max_words = Some(parse_value(key, &value)?),
            "overlap-words" => updated.rag.overlap_words = Some(parse_value(key, &value)?),
            "top-k" => updated.rag.top_k = Some(parse_value(key, &value)?),
            "timeout-secs" => updated.rag.timeout_secs = Some(parse_value(key, &value)?),
            "min-similarity" => updated.rag.min_similarity = Some(parse_value(key, &value)?),
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Unset (remove) a config value by key
    pub fn unset(&mut self, key: &str) -> Result<()> {
        match normalize_key(key).as_str() {
            "google-ai-api-key" => self.api.google_ai_api_key = None,
            "generation-model" => self.models.generation = None,
            "embedding-model" => self.models.embedding = None,
            "max-words" => self.rag.max_words = None,
            "overlap-words" => self.rag.overlap_words = None,
            "top-k" => self.rag.top_k = None,
            "timeout-secs" => self.rag.timeout_secs = None,
            "min-similarity" => self.rag.min_similarity = None,
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Get all set config values as key-value pairs, API key masked
    pub fn list(&self) -> Vec<(String, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| {
                self.get(key).map(|value| {
                    let shown = if *key == "google-ai-api-key" {
                        mask_api_key(&value)
                    } else {
                        value
                    };
                    (key.to_string(), shown)
                })
            })
            .collect()
    }
}

/// Get Google AI API key with priority: environment variable > config file
pub fn get_google_ai_api_key() -> Result<Option<String>> {
    for var in [env_apis::GOOGLE_AI_API_KEY, env_apis::GEMINI_API_KEY] {
        if let Ok(key) = std::env::var(var) {
            if !key.is_empty() {
                return Ok(Some(key));
            }
        }
    }

    let config = Config::load()?;
    Ok(config.api.google_ai_api_key)
}

/// Check if Google AI API key is configured (either in env or config file)
pub fn has_google_ai_api_key() -> bool {
    get_google_ai_api_key().ok().flatten().is_some()
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace('_', "-")
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("Invalid value for {key}: {value} ({e})"))
}

/// Mask API key for display (show first 4 and last 4 characters)
fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
