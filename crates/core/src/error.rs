//! Workspace-wide error type

use thiserror::Error;

/// Errors shared across the workspace
#[derive(Error, Debug)]
pub enum Error {
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Workspace result alias
pub type Result<T> = std::result::Result<T, Error>;
