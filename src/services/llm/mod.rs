//! Text generation seam used by the contextual generator.

pub mod errors;
#[cfg(feature = "reqwest")]
pub mod google_ai;
pub mod traits;
pub mod types;

pub use errors::LlmError;
#[cfg(feature = "reqwest")]
pub use google_ai::GoogleAiAdapter;
pub use traits::LlmClient;
pub use types::{GenerateRequest, GenerateResponse, TokenUsage};

#[cfg(test)]
pub use traits::MockLlmClient;
