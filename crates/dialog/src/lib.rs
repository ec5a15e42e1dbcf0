//! Conversational matching and session state engine
//!
//! The decision core of the clinic receptionist:
//! - Knowledge base: static topic -> trigger phrases / canonical answer
//! - Matcher: trigger-phrase containment, then string similarity
//! - Fallback responder: generative completion, never fails outward
//! - Session store: per-call no-input counter and turn log
//! - Dialogue controller: one conversational turn end to end

pub mod controller;
pub mod fallback;
pub mod knowledge;
pub mod matcher;
pub mod session;

pub use controller::DialogueController;
pub use fallback::FallbackResponder;
pub use knowledge::{KnowledgeBase, Topic};
pub use matcher::Matcher;
pub use session::{CallSession, InMemorySessionStore, SessionLease, SessionStore};
