//! OpenAI-compatible backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use clinic_voice_core::{GenerateRequest, GenerateResponse, TextGenerator};

use crate::prompt::Message;
use crate::LlmError;

/// Backend configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model name/ID
    pub model: String,
    /// API endpoint (base URL, `/chat/completions` is appended)
    pub endpoint: String,
    /// API key
    pub api_key: Option<String>,
    /// Maximum tokens to generate
    pub max_tokens: usize,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout; expiry is treated like any other failure
    pub timeout: Duration,
    /// Maximum retry attempts for transient failures
    pub max_retries: u32,
    /// Initial backoff duration, doubles each retry
    pub initial_backoff: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo-instruct".to_string(),
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: None,
            max_tokens: 50,
            temperature: 0.7,
            timeout: Duration::from_secs(10),
            max_retries: 2,
            initial_backoff: Duration::from_millis(100),
        }
    }
}

impl From<&clinic_voice_config::LlmSettings> for LlmConfig {
    fn from(settings: &clinic_voice_config::LlmSettings) -> Self {
        Self {
            model: settings.model.clone(),
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            timeout: Duration::from_secs(settings.timeout_secs),
            ..Self::default()
        }
    }
}

/// OpenAI-compatible chat completions backend
#[derive(Clone)]
pub struct OpenAiBackend {
    client: Client,
    config: LlmConfig,
}

impl OpenAiBackend {
    /// Create a new backend
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    /// Execute a single request (used by the retry loop)
    async fn execute_request(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let mut builder = self.client.post(self.api_url("/chat/completions"));
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error = response.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(LlmError::Quota(error));
            }
            // 5xx errors are retryable, 4xx are not
            if status.is_server_error() {
                return Err(LlmError::Network(format!("server error {status}: {error}")));
            }
            return Err(LlmError::Api(error));
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }

    fn is_retryable(error: &LlmError) -> bool {
        matches!(error, LlmError::Network(_) | LlmError::Timeout)
    }

    async fn generate_inner(&self, request: GenerateRequest) -> Result<String, LlmError> {
        let chat_request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![Message::user(request.prompt)],
            max_tokens: request.max_tokens.min(self.config.max_tokens),
            temperature: request.temperature,
        };

        let mut last_error = None;
        let mut backoff = self.config.initial_backoff;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::warn!(
                    "completion request failed, retrying in {:?} (attempt {}/{})",
                    backoff,
                    attempt,
                    self.config.max_retries
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }

            match self.execute_request(&chat_request).await {
                Ok(result) => {
                    let choice = result
                        .choices
                        .into_iter()
                        .next()
                        .ok_or_else(|| LlmError::InvalidResponse("no choices".to_string()))?;
                    return Ok(choice.message.content);
                }
                Err(e) if Self::is_retryable(&e) => {
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Network("max retries exceeded".to_string())))
    }
}

#[async_trait]
impl TextGenerator for OpenAiBackend {
    async fn generate(
        &self,
        request: GenerateRequest,
    ) -> clinic_voice_core::Result<GenerateResponse> {
        let text = self.generate_inner(request).await?;
        Ok(GenerateResponse::text(text))
    }

    async fn is_available(&self) -> bool {
        let mut builder = self.client.get(self.api_url("/models"));
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// Chat completions API types
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Message,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = LlmConfig::default();
        assert_eq!(config.max_tokens, 50);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_config_from_settings() {
        let settings = clinic_voice_config::LlmSettings {
            model: "test-model".to_string(),
            api_key: Some("sk-test".to_string()),
            timeout_secs: 3,
            ..Default::default()
        };
        let config = LlmConfig::from(&settings);
        assert_eq!(config.model, "test-model");
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_api_url() {
        let config = LlmConfig {
            endpoint: "http://localhost:8080/v1/".to_string(),
            ..Default::default()
        };
        let backend = OpenAiBackend::new(config).unwrap();
        assert_eq!(
            backend.api_url("/chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            model: "m".to_string(),
            messages: vec![Message::user("hi")],
            max_tokens: 50,
            temperature: 0.7,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 50);
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"We open at 8 AM."}}]}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content, "We open at 8 AM.");
    }

    #[tokio::test]
    async fn test_unreachable_backend_errors() {
        let config = LlmConfig {
            endpoint: "http://127.0.0.1:1".to_string(),
            timeout: Duration::from_millis(200),
            max_retries: 0,
            ..Default::default()
        };
        let backend = OpenAiBackend::new(config).unwrap();
        assert!(!backend.is_available().await);

        let result = backend.generate(GenerateRequest::new("hello")).await;
        assert!(result.is_err());
    }
}
