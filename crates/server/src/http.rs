//! HTTP endpoints
//!
//! The telephony collaborator posts form-encoded webhook events
//! (`CallSid`, `SpeechResult`) and receives JSON speak directives.

use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use clinic_voice_core::SpeechDirective;
use clinic_voice_dialog::SessionStore;

use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Telephony webhooks
        .route("/voice", post(handle_call))
        .route("/handle-input", post(handle_input))
        // Session admin
        .route("/api/sessions", get(list_sessions))
        .route("/api/sessions/:id", delete(delete_session))
        // Health
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Call-start event payload
#[derive(Debug, Deserialize)]
struct CallStartForm {
    #[serde(rename = "CallSid")]
    call_sid: Option<String>,
}

/// Turn event payload; `SpeechResult` is absent when no speech was
/// detected
#[derive(Debug, Deserialize)]
struct TurnForm {
    #[serde(rename = "CallSid")]
    call_sid: Option<String>,
    #[serde(rename = "SpeechResult", default)]
    speech_result: String,
}

/// Inbound call: greet and start collecting speech
async fn handle_call(
    State(state): State<AppState>,
    Form(form): Form<CallStartForm>,
) -> Json<SpeechDirective> {
    let directive = state.controller.start_call(form.call_sid.as_deref()).await;
    Json(directive)
}

/// One transcribed utterance
async fn handle_input(
    State(state): State<AppState>,
    Form(form): Form<TurnForm>,
) -> Json<SpeechDirective> {
    let directive = state
        .controller
        .handle_turn(form.call_sid.as_deref(), &form.speech_result)
        .await;
    Json(directive)
}

/// List live sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.sessions.list().await;
    Json(serde_json::json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
}

/// Drop a session
async fn delete_session(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.sessions.remove(&id).await;
    StatusCode::NO_CONTENT
}

/// Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness check
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ready",
        "sessions": state.sessions.count().await,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use clinic_voice_config::Settings;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn form_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_call_start_greets() {
        let router = create_router(AppState::new(Settings::default()));
        let response = router
            .oneshot(form_request("/voice", "CallSid=CA-1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(
            json["speak"],
            "Welcome to the Family Walk-In Clinic. How can I help you today?"
        );
        assert_eq!(json["gather"]["action"], "/handle-input");
        assert!(json.get("hangup").is_none());
    }

    #[tokio::test]
    async fn test_turn_answers_known_question() {
        let router = create_router(AppState::new(Settings::default()));
        let response = router
            .oneshot(form_request(
                "/handle-input",
                "CallSid=CA-1&SpeechResult=where+are+you",
            ))
            .await
            .unwrap();

        let json = json_body(response).await;
        let speak = json["speak"].as_str().unwrap();
        assert!(speak.starts_with("We are located at 123 Main Street"));
        assert!(speak.ends_with("Is there anything else I can help you with?"));
    }

    #[tokio::test]
    async fn test_turn_without_speech_reprompts() {
        let router = create_router(AppState::new(Settings::default()));
        let response = router
            .oneshot(form_request("/handle-input", "CallSid=CA-1"))
            .await
            .unwrap();

        let json = json_body(response).await;
        assert_eq!(
            json["speak"],
            "I didn't quite catch that. Could you please repeat?"
        );
        assert_eq!(json["gather"]["action"], "/handle-input");
    }

    #[tokio::test]
    async fn test_end_phrase_hangs_up() {
        let router = create_router(AppState::new(Settings::default()));
        let response = router
            .oneshot(form_request(
                "/handle-input",
                "CallSid=CA-1&SpeechResult=no+thank+you",
            ))
            .await
            .unwrap();

        let json = json_body(response).await;
        assert_eq!(json["speak"], "Thank you for calling. Have a great day!");
        assert_eq!(json["hangup"], true);
        assert!(json.get("gather").is_none());
    }

    #[tokio::test]
    async fn test_session_admin_endpoints() {
        let state = AppState::new(Settings::default());
        state.controller.start_call(Some("CA-1")).await;

        let router = create_router(state);
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/sessions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = json_body(response).await;
        assert_eq!(json["count"], 1);

        let response = router
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/api/sessions/CA-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_health() {
        let router = create_router(AppState::new(Settings::default()));
        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
