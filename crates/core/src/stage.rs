//! Call lifecycle stages

use serde::{Deserialize, Serialize};

/// Stages of a single inbound call
///
/// A call enters `Greeting` when the telephony layer announces it,
/// moves to `AwaitingInput` once the welcome prompt is issued, cycles
/// through `Responding` for every utterance, and terminates in `Ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CallStage {
    /// Call just started, no user input yet
    #[default]
    Greeting,
    /// Prompt issued, waiting for the next utterance
    AwaitingInput,
    /// Processing a received utterance
    Responding,
    /// Call hung up, terminal
    Ended,
}

impl CallStage {
    /// Get allowed transitions from the current stage
    pub fn allowed_transitions(&self) -> Vec<CallStage> {
        match self {
            CallStage::Greeting => vec![CallStage::AwaitingInput],
            CallStage::AwaitingInput => vec![CallStage::Responding, CallStage::Ended],
            CallStage::Responding => vec![CallStage::AwaitingInput, CallStage::Ended],
            CallStage::Ended => vec![],
        }
    }

    /// Check if a transition to the target stage is allowed
    pub fn can_transition_to(&self, target: CallStage) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Terminal stages never process further input
    pub fn is_terminal(&self) -> bool {
        matches!(self, CallStage::Ended)
    }
}

impl std::fmt::Display for CallStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallStage::Greeting => write!(f, "Greeting"),
            CallStage::AwaitingInput => write!(f, "Awaiting Input"),
            CallStage::Responding => write!(f, "Responding"),
            CallStage::Ended => write!(f, "Ended"),
        }
    }
}
