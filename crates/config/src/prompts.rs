//! Fixed prompt catalogue
//!
//! Every canned utterance the receptionist speaks. Kept in one place
//! so deployments can re-word the persona without touching dialogue
//! logic.

use serde::{Deserialize, Serialize};

/// All fixed utterances and the fallback persona framing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplates {
    /// Spoken when a call starts
    pub welcome: String,
    /// Spoken when no speech was detected, retries remaining
    pub reprompt: String,
    /// Spoken before hanging up after repeated silence
    pub no_input_farewell: String,
    /// Spoken before hanging up when the caller is done
    pub closing: String,
    /// Appended after every answer to invite the next question
    pub continuation: String,
    /// Spoken when the generative fallback fails
    pub fallback_apology: String,
    /// Persona framing for the generative fallback; `{input}` is
    /// replaced with the caller's raw utterance
    pub fallback_persona: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            welcome: "Welcome to the Family Walk-In Clinic. How can I help you today?"
                .to_string(),
            reprompt: "I didn't quite catch that. Could you please repeat?".to_string(),
            no_input_farewell: "I'm sorry, I couldn't hear you. Goodbye.".to_string(),
            closing: "Thank you for calling. Have a great day!".to_string(),
            continuation: "Is there anything else I can help you with?".to_string(),
            fallback_apology:
                "I'm sorry, I am having trouble retrieving that information at the moment."
                    .to_string(),
            fallback_persona: "You are a helpful receptionist at a Family Walk In Clinic. \
                 A caller asks: '{input}'. Please respond with a short, helpful answer \
                 related to the clinic's operations."
                .to_string(),
        }
    }
}

impl PromptTemplates {
    /// Build the fallback prompt for a caller utterance
    pub fn fallback_prompt(&self, input: &str) -> String {
        self.fallback_persona.replace("{input}", input)
    }

    /// Compose an answer with the continuation prompt
    pub fn with_continuation(&self, answer: &str) -> String {
        format!("{} {}", answer, self.continuation)
    }
}
