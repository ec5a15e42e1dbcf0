//! Dialogue controller
//!
//! Orchestrates one conversational turn: end-of-call detection, the
//! no-input retry policy, matcher/fallback resolution, and directive
//! composition. Every path returns a valid spoken directive; nothing
//! here can fail outward.

use std::sync::Arc;

use clinic_voice_config::PromptTemplates;
use clinic_voice_core::{CallStage, SpeechDirective, TurnRecord};

use crate::fallback::FallbackResponder;
use crate::matcher::Matcher;
use crate::session::{CallSession, SessionStore};

/// Phrases that end the conversation, checked as substrings of the
/// normalized utterance before any matching happens
const END_PHRASES: [&str; 6] = [
    "no",
    "nothing else",
    "that's all",
    "bye",
    "goodbye",
    "no thank you",
];

/// Empty utterances tolerated before hanging up
const MAX_NO_INPUT: u32 = 2;

/// Per-call turn orchestrator
pub struct DialogueController {
    matcher: Matcher,
    fallback: FallbackResponder,
    store: Arc<dyn SessionStore>,
    templates: PromptTemplates,
    gather_action: String,
}

impl DialogueController {
    pub fn new(
        matcher: Matcher,
        fallback: FallbackResponder,
        store: Arc<dyn SessionStore>,
        templates: PromptTemplates,
        gather_action: impl Into<String>,
    ) -> Self {
        Self {
            matcher,
            fallback,
            store,
            templates,
            gather_action: gather_action.into(),
        }
    }

    /// Handle a call-start event
    ///
    /// Overwrites any previous session for the identifier. A missing
    /// identifier is tolerated: no session is created and later turns
    /// run in degraded stateless mode.
    pub async fn start_call(&self, call_id: Option<&str>) -> SpeechDirective {
        match call_id {
            Some(id) => {
                let _lease = self.store.lease(id).await;
                let mut session = CallSession::greeting();
                session.advance(CallStage::AwaitingInput);
                self.store.put(id, session).await;
                tracing::info!(call_id = %id, "call started");
            }
            None => {
                tracing::warn!("call start without identifier, continuing stateless");
            }
        }

        SpeechDirective::gather(&self.templates.welcome, &self.gather_action)
    }

    /// Handle one transcribed utterance
    pub async fn handle_turn(&self, call_id: Option<&str>, utterance: &str) -> SpeechDirective {
        match call_id {
            Some(id) => {
                // The lease is held for the whole turn, so turns for
                // one call serialize; other calls are unaffected.
                let _lease = self.store.lease(id).await;
                let session = self.store.get(id).await;
                self.process_turn(Some(id), session, utterance).await
            }
            None => {
                // Degraded stateless mode on a scratch session
                self.process_turn(None, CallSession::default(), utterance)
                    .await
            }
        }
    }

    async fn process_turn(
        &self,
        call_id: Option<&str>,
        mut session: CallSession,
        utterance: &str,
    ) -> SpeechDirective {
        let utterance = utterance.trim();

        if utterance.is_empty() {
            let count = session.record_no_input();
            if count > MAX_NO_INPUT {
                tracing::info!(call_id = ?call_id, "repeated silence, hanging up");
                self.end_session(call_id).await;
                return SpeechDirective::hangup(&self.templates.no_input_farewell);
            }
            session.touch();
            self.persist(call_id, &session).await;
            return SpeechDirective::gather(&self.templates.reprompt, &self.gather_action);
        }

        session.reset_no_input();
        session.advance(CallStage::Responding);

        let normalized = utterance.to_lowercase();
        if END_PHRASES.iter().any(|p| normalized.contains(p)) {
            session.advance(CallStage::Ended);
            tracing::info!(call_id = ?call_id, "caller ended conversation");
            self.end_session(call_id).await;
            return SpeechDirective::hangup(&self.templates.closing);
        }

        // Counter reset is persisted before any external call; the
        // turn itself is appended after.
        session.touch();
        self.persist(call_id, &session).await;

        let answer = match self.matcher.resolve(utterance) {
            Some(answer) => {
                tracing::info!(call_id = ?call_id, utterance, answer, "matched knowledge base");
                answer.to_string()
            }
            None => self.fallback.respond(utterance).await,
        };

        session.push_turn(TurnRecord::new(utterance, answer.clone()));
        session.advance(CallStage::AwaitingInput);
        session.touch();
        self.persist(call_id, &session).await;

        SpeechDirective::gather(
            self.templates.with_continuation(&answer),
            &self.gather_action,
        )
    }

    async fn persist(&self, call_id: Option<&str>, session: &CallSession) {
        if let Some(id) = call_id {
            self.store.put(id, session.clone()).await;
        }
    }

    async fn end_session(&self, call_id: Option<&str>) {
        if let Some(id) = call_id {
            self.store.remove(id).await;
        }
    }
}
