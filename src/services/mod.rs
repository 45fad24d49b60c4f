//! External service clients.

#[cfg(feature = "reqwest")]
pub mod google_ai;
pub mod llm;
