//! Clinic voice receptionist server
//!
//! Receives telephony webhook events and answers each with a
//! speak + (collect-next | hangup) directive.

pub mod http;
pub mod state;

pub use http::create_router;
pub use state::AppState;
