//! Spoken-response directives
//!
//! Every inbound telephony event is answered with a directive telling
//! the telephony layer what to speak and whether to collect another
//! utterance or hang up. The transport markup itself is the telephony
//! collaborator's concern; the directive is plain structured data.
//!
//! Wire shape: `{ "speak": …, "gather": { "action": … } }` to collect
//! the next utterance, `{ "speak": …, "hangup": true }` to terminate.

use serde::{Deserialize, Serialize};

/// Where the next utterance should be posted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatherAction {
    /// Endpoint for the next turn event
    pub action: String,
}

/// What the telephony layer should do after speaking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectiveAction {
    /// Collect the next utterance
    Gather { gather: GatherAction },
    /// Terminate the call
    Hangup { hangup: bool },
}

/// A speak + (collect-next | hangup) instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechDirective {
    /// Text to render as speech
    pub speak: String,
    /// Follow-up call control
    #[serde(flatten)]
    pub action: DirectiveAction,
}

impl SpeechDirective {
    /// Speak, then collect the next utterance at `action`
    pub fn gather(speak: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            speak: speak.into(),
            action: DirectiveAction::Gather {
                gather: GatherAction {
                    action: action.into(),
                },
            },
        }
    }

    /// Speak a final remark, then hang up
    pub fn hangup(speak: impl Into<String>) -> Self {
        Self {
            speak: speak.into(),
            action: DirectiveAction::Hangup { hangup: true },
        }
    }

    /// Does this directive terminate the call?
    pub fn is_hangup(&self) -> bool {
        matches!(self.action, DirectiveAction::Hangup { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_directive() {
        let d = SpeechDirective::gather("How can I help?", "/handle-input");
        assert!(!d.is_hangup());
        assert_eq!(
            d.action,
            DirectiveAction::Gather {
                gather: GatherAction {
                    action: "/handle-input".to_string()
                }
            }
        );
    }

    #[test]
    fn test_hangup_directive() {
        let d = SpeechDirective::hangup("Goodbye.");
        assert!(d.is_hangup());
    }

    #[test]
    fn test_wire_shape() {
        let d = SpeechDirective::gather("Hello", "/handle-input");
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["speak"], "Hello");
        assert!(json.get("gather").is_some(), "expected top-level gather key");
        assert_eq!(json["gather"]["action"], "/handle-input");
        assert!(json.get("hangup").is_none());

        let d = SpeechDirective::hangup("Bye");
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["speak"], "Bye");
        assert_eq!(json["hangup"], true);
        assert!(json.get("gather").is_none());
    }

    #[test]
    fn test_wire_round_trip() {
        let gather: SpeechDirective =
            serde_json::from_str(r#"{"speak":"Hi","gather":{"action":"/handle-input"}}"#).unwrap();
        assert_eq!(gather, SpeechDirective::gather("Hi", "/handle-input"));

        let hangup: SpeechDirective =
            serde_json::from_str(r#"{"speak":"Bye","hangup":true}"#).unwrap();
        assert!(hangup.is_hangup());
    }
}
