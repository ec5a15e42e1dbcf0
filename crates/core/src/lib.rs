//! Core types and traits for the clinic voice receptionist
//!
//! This crate provides the foundational types used across all other
//! crates:
//! - Call stage machine and turn records
//! - Spoken-response directives returned to the telephony layer
//! - The `TextGenerator` trait for the generative-text collaborator
//! - Error types

pub mod directive;
pub mod error;
pub mod stage;
pub mod traits;
pub mod turn;

pub use directive::{DirectiveAction, GatherAction, SpeechDirective};
pub use error::{Error, Result};
pub use stage::CallStage;
pub use traits::{GenerateRequest, GenerateResponse, TextGenerator, UnavailableGenerator};
pub use turn::TurnRecord;
