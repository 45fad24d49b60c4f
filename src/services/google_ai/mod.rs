//! Minimal Gemini REST client: `generateContent` and `embedContent`.

pub mod client;
pub mod errors;
pub mod models;
pub mod retry;

pub use client::{GoogleAiClient, GoogleAiConfig};
pub use errors::GoogleAiError;
pub use models::{
    EmbedContentRequest, EmbedContentResponse, GenerateContentRequest, GenerateContentResponse,
};
