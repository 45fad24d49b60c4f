//! Environment variable constants used throughout the application
//!
//! This module centralizes all environment variable names so the config
//! layer, logging setup and API clients agree on them.

/// Logging configuration
pub mod logging {
    /// Log level configuration (e.g., "debug", "info", "warn", "error")
    pub const LOG_LEVEL: &str = "RAGCTX_LOG_LEVEL";

    /// Log file path for file-based logging
    pub const LOG_FILE: &str = "RAGCTX_LOG_FILE";

    /// Set to "json" for one JSON object per event
    pub const LOG_FORMAT: &str = "RAGCTX_LOG_FORMAT";

    /// Disable colored output (follows the NO_COLOR standard)
    pub const NO_COLOR: &str = "NO_COLOR";
}

/// External API configuration
pub mod apis {
    /// Google AI API key used for generation and embeddings
    pub const GOOGLE_AI_API_KEY: &str = "GOOGLE_AI_API_KEY";

    /// Fallback name used by Gemini tooling
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
}

/// Generation settings
pub mod generation {
    /// Timeout for a single generation call (seconds)
    pub const TIMEOUT: &str = "RAGCTX_TIMEOUT";
}
