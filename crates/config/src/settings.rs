//! Runtime settings
//!
//! Layered load order, later sources override earlier ones:
//! 1. Built-in defaults
//! 2. Optional TOML file (path from `CLINIC_VOICE_CONFIG`, default
//!    `config/clinic-voice.toml`)
//! 3. Environment variables with the `CLINIC_VOICE` prefix, `__` as
//!    the section separator (e.g. `CLINIC_VOICE__SERVER__PORT=8080`)

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Top-level settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Generative-text collaborator settings
    #[serde(default)]
    pub llm: LlmSettings,
    /// Session store settings
    #[serde(default)]
    pub session: SessionConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Generative-text collaborator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Model name/ID
    pub model: String,
    /// API endpoint
    pub endpoint: String,
    /// API key; usually injected via `CLINIC_VOICE__LLM__API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,
    /// Maximum tokens to generate
    pub max_tokens: usize,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo-instruct".to_string(),
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: None,
            max_tokens: 50,
            temperature: 0.7,
            timeout_secs: 10,
        }
    }
}

/// Session store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle time before a session may be evicted, in seconds
    pub idle_timeout_secs: u64,
    /// How often the cleanup task scans for idle sessions, in seconds
    pub cleanup_interval_secs: u64,
    /// Whether the cleanup task is started at all
    pub cleanup_enabled: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 3600,
            cleanup_interval_secs: 300,
            cleanup_enabled: true,
        }
    }
}

/// Load settings from defaults, optional file, and environment
pub fn load_settings() -> Result<Settings, ConfigError> {
    let path = std::env::var("CLINIC_VOICE_CONFIG")
        .unwrap_or_else(|_| "config/clinic-voice.toml".to_string());

    let builder = config::Config::builder()
        .add_source(config::File::with_name(&path).required(false))
        .add_source(
            config::Environment::with_prefix("CLINIC_VOICE")
                .separator("__")
                .try_parsing(true),
        );

    let settings: Settings = builder.build()?.try_deserialize()?;

    if settings.llm.api_key.is_none() {
        tracing::warn!("no LLM API key configured, fallback answers will use the fixed apology");
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.llm.max_tokens, 50);
        assert_eq!(settings.session.idle_timeout_secs, 3600);
        assert!(settings.llm.api_key.is_none());
    }

    #[test]
    fn test_bind_addr() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9000,
        };
        assert_eq!(server.bind_addr(), "127.0.0.1:9000");
    }

    #[test]
    fn test_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinic-voice.toml");
        std::fs::write(&path, "[server]\nhost = \"127.0.0.1\"\nport = 9100\n").unwrap();

        let settings: Settings = config::Config::builder()
            .add_source(config::File::from(path.as_path()))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 9100);
        // Untouched sections keep their defaults
        assert_eq!(settings.llm.timeout_secs, 10);
    }
}
