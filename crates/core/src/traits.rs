//! Generative-text collaborator trait

use async_trait::async_trait;

use crate::{Error, Result};

/// A bounded text-generation request
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Full prompt, persona framing included
    pub prompt: String,
    /// Hard cap on generated tokens
    pub max_tokens: usize,
    /// Sampling temperature
    pub temperature: f32,
}

impl GenerateRequest {
    /// Create a request with the workspace's short-completion defaults
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: 50,
            temperature: 0.7,
        }
    }

    /// Override the token cap
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Override the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Generated completion
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    /// Generated text, already trimmed
    pub text: String,
}

impl GenerateResponse {
    pub fn text(text: impl Into<String>) -> Self {
        let text: String = text.into();
        Self {
            text: text.trim().to_string(),
        }
    }
}

/// Generative-text collaborator interface
///
/// Implementations:
/// - `OpenAiBackend` - OpenAI-compatible chat completions API
///
/// The caller treats every error uniformly: a failed generation is
/// recovered locally and never surfaced past the fallback responder.
///
/// # Example
///
/// ```ignore
/// let llm: Arc<dyn TextGenerator> = Arc::new(OpenAiBackend::new(config)?);
/// let response = llm.generate(GenerateRequest::new("A caller asks: ...")).await?;
/// println!("{}", response.text);
/// ```
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a short completion for the prompt
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;

    /// Check whether the backend is reachable
    async fn is_available(&self) -> bool;

    /// Model name for logging
    fn model_name(&self) -> &str;
}

/// Helper for tests and degraded startup: always fails
pub struct UnavailableGenerator;

#[async_trait]
impl TextGenerator for UnavailableGenerator {
    async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse> {
        Err(Error::Generation("no generative backend configured".to_string()))
    }

    async fn is_available(&self) -> bool {
        false
    }

    fn model_name(&self) -> &str {
        "unavailable"
    }
}
