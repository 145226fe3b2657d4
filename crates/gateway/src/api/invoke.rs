//! The single workflow endpoint: one state-machine traversal per call.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use cf_engine::{Credentials, TraversalOutcome, TurnInput};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InvokeRequest {
    pub session_id: String,
    #[serde(default)]
    pub credentials: Option<CredentialsBody>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

/// Submitted credentials. Consumed by the login node this turn and
/// never written to the session snapshot.
#[derive(Debug, Deserialize)]
pub struct CredentialsBody {
    pub identity: String,
    pub secret: String,
}

#[derive(Debug, Serialize)]
pub struct InvokeResponse {
    pub role: String,
    pub authorization_context_summary: String,
    pub last_message: String,
    /// `"login"`, `"<role>_menu"`, or `"exit"`.
    pub halted_at: String,
}

/// `POST /v1/invoke` — load the session snapshot, run one traversal
/// under the per-session lock, persist the result.
pub async fn invoke(State(state): State<AppState>, Json(req): Json<InvokeRequest>) -> Response {
    if req.session_id.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "session_id must not be empty" })),
        )
            .into_response();
    }

    // Exactly one traversal in flight per session id; a concurrent call
    // for the same session waits here.
    let _permit = state.session_locks.acquire(&req.session_id).await;

    let snapshot = state.sessions.load(&req.session_id);
    let input = TurnInput {
        credentials: req.credentials.map(|c| Credentials {
            identity: c.identity,
            secret: c.secret,
        }),
        action: req.action,
        payload: req.payload,
    };

    let (next, outcome) = state.executor.run_turn(snapshot, input).await;

    let halted_at = match &outcome {
        TraversalOutcome::Halted(at) => at.wire_name(),
        TraversalOutcome::Terminated => "exit".to_string(),
        TraversalOutcome::Aborted(reason) => {
            // Persist however far the traversal got, then fail the call.
            let reason = reason.clone();
            persist(&state, next);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": format!("workflow aborted: {reason}") })),
            )
                .into_response();
        }
    };

    let body = InvokeResponse {
        role: next.role.as_str().to_string(),
        authorization_context_summary: next.authz.summary(),
        last_message: next.last_message.clone(),
        halted_at,
    };
    persist(&state, next);

    (StatusCode::OK, Json(body)).into_response()
}

/// Save the snapshot and flush both file-backed stores. Flush failures
/// are logged, not surfaced; the in-memory state is already current.
fn persist(state: &AppState, snapshot: cf_sessions::SessionState) {
    state.sessions.save(snapshot);
    if let Err(e) = state.sessions.flush() {
        tracing::warn!(error = %e, "session store flush failed");
    }
    if let Err(e) = state.directory.flush() {
        tracing::warn!(error = %e, "directory flush failed");
    }
}
