pub mod auth;
pub mod invoke;

use axum::extract::State;
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::state::AppState;

/// Build the API router.
///
/// Routes are split into **public** (no auth required) and **protected**
/// (gated behind the bearer-token middleware).
///
/// `state` is needed to wire up the auth middleware at build time.
pub fn router(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/v1/health", get(health));

    let protected = Router::new()
        .route("/v1/invoke", post(invoke::invoke))
        .route("/v1/sessions", get(list_sessions))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::require_api_token,
        ));

    public.merge(protected)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Diagnostic listing of persisted session snapshots. Identity-bearing
/// fields stay out of it; only routing-relevant state is shown.
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions: Vec<serde_json::Value> = state
        .sessions
        .list()
        .into_iter()
        .map(|s| {
            serde_json::json!({
                "session_id": s.session_id,
                "role": s.role.as_str(),
                "authorization_context_summary": s.authz.summary(),
                "updated_at": s.updated_at,
            })
        })
        .collect();

    Json(serde_json::json!({
        "sessions": sessions,
        "tracked_locks": state.session_locks.session_count(),
    }))
}
