//! Configuration management for the clinic voice receptionist
//!
//! Supports loading configuration from:
//! - TOML files
//! - Environment variables (CLINIC_VOICE_ prefix)
//!
//! Also holds the fixed prompt catalogue: every utterance the
//! receptionist can speak outside of a knowledge-base answer or a
//! generated completion lives in [`PromptTemplates`].

pub mod prompts;
pub mod settings;

pub use prompts::PromptTemplates;
pub use settings::{load_settings, LlmSettings, ServerConfig, SessionConfig, Settings};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
