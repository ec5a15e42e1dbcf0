//! Generative fallback responder
//!
//! Invoked only when the matcher finds nothing. Never fails outward:
//! any collaborator error becomes the fixed apology, so a broken or
//! slow model can never terminate a call abnormally.

use std::sync::Arc;

use clinic_voice_config::PromptTemplates;
use clinic_voice_core::{GenerateRequest, TextGenerator};

/// Wraps the generative-text collaborator behind an infallible call
pub struct FallbackResponder {
    llm: Arc<dyn TextGenerator>,
    templates: PromptTemplates,
    max_tokens: usize,
    temperature: f32,
}

impl FallbackResponder {
    pub fn new(llm: Arc<dyn TextGenerator>, templates: PromptTemplates) -> Self {
        Self {
            llm,
            templates,
            max_tokens: 50,
            temperature: 0.7,
        }
    }

    /// Override the generation bounds
    pub fn with_bounds(mut self, max_tokens: usize, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    /// Answer an unmatched utterance
    ///
    /// The raw, non-normalized input is embedded in the persona prompt.
    pub async fn respond(&self, input: &str) -> String {
        let request = GenerateRequest::new(self.templates.fallback_prompt(input))
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);

        match self.llm.generate(request).await {
            Ok(response) => {
                tracing::info!(model = %self.llm.model_name(), input, "generative fallback used");
                response.text
            }
            Err(e) => {
                tracing::error!(model = %self.llm.model_name(), error = %e, "generative fallback failed");
                self.templates.fallback_apology.clone()
            }
        }
    }
}
