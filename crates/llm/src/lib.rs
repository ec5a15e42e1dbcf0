//! Generative-text collaborator
//!
//! Implements [`clinic_voice_core::TextGenerator`] over an
//! OpenAI-compatible chat completions API. Every failure mode of the
//! external call is folded into [`LlmError`]; callers upstream map any
//! variant to the same fixed apology, so no error kind ever reaches
//! the telephone line.

pub mod backend;
pub mod prompt;

pub use backend::{LlmConfig, OpenAiBackend};
pub use prompt::{Message, Role};

use thiserror::Error;

/// Generative collaborator errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Quota exhausted: {0}")]
    Quota(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for clinic_voice_core::Error {
    fn from(err: LlmError) -> Self {
        clinic_voice_core::Error::Generation(err.to_string())
    }
}
