//! Conversation turn records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One utterance-and-response exchange within a call
///
/// Appended to the session's turn log after every answered utterance.
/// The log is recorded for operator visibility only; it is never used
/// to disambiguate later turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// What the caller said (raw transcription)
    pub user: String,
    /// What the receptionist answered
    pub assistant: String,
    /// When the turn completed
    pub timestamp: DateTime<Utc>,
}

impl TurnRecord {
    /// Create a new turn record stamped with the current time
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
            timestamp: Utc::now(),
        }
    }
}
