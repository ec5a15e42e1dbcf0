//! Shared application state

use std::sync::Arc;

use clinic_voice_config::{PromptTemplates, Settings};
use clinic_voice_core::{TextGenerator, UnavailableGenerator};
use clinic_voice_dialog::{
    DialogueController, FallbackResponder, InMemorySessionStore, KnowledgeBase, Matcher,
    SessionStore,
};
use clinic_voice_llm::{LlmConfig, OpenAiBackend};

/// Endpoint the telephony layer posts transcribed utterances to
pub const TURN_ACTION: &str = "/handle-input";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Turn orchestrator
    pub controller: Arc<DialogueController>,
    /// Session store, exposed for admin endpoints and cleanup
    pub sessions: Arc<InMemorySessionStore>,
    /// Loaded settings
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Wire the dialog engine from settings
    ///
    /// A misconfigured generative backend degrades to the fixed
    /// apology path instead of refusing to start: the receptionist
    /// must keep answering calls regardless.
    pub fn new(settings: Settings) -> Self {
        let sessions = Arc::new(InMemorySessionStore::new());
        let templates = PromptTemplates::default();

        let llm: Arc<dyn TextGenerator> = match OpenAiBackend::new(LlmConfig::from(&settings.llm))
        {
            Ok(backend) => Arc::new(backend),
            Err(e) => {
                tracing::warn!(error = %e, "generative backend unavailable, using apology fallback");
                Arc::new(UnavailableGenerator)
            }
        };

        let matcher = Matcher::new(Arc::new(KnowledgeBase::builtin()));
        let fallback = FallbackResponder::new(llm, templates.clone())
            .with_bounds(settings.llm.max_tokens, settings.llm.temperature);

        let store: Arc<dyn SessionStore> = sessions.clone();
        let controller = Arc::new(DialogueController::new(
            matcher,
            fallback,
            store,
            templates,
            TURN_ACTION,
        ));

        Self {
            controller,
            sessions,
            settings: Arc::new(settings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_state_wiring() {
        let state = AppState::new(Settings::default());
        assert_eq!(state.sessions.count().await, 0);

        let directive = state.controller.start_call(Some("CA-1")).await;
        assert!(!directive.is_hangup());
        assert_eq!(state.sessions.count().await, 1);
    }
}
