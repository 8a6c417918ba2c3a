use crate::models::{AnalyzeOutcome, Notice, RejectReason};
use crate::state::SurfaceAppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

/// API-level failures
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Analyze preconditions unmet
    #[error("{}", .0.message)]
    Rejected(Notice),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Rejected(notice) => (
                StatusCode::CONFLICT,
                Json(serde_json::json!({
                    "error": notice.message,
                    "reason": notice.reason,
                })),
            )
                .into_response(),
        }
    }
}

// ============================================================================
// Health
// ============================================================================

pub async fn health(State(state): State<SurfaceAppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "model": state.loader.model_id(),
        "load_state": state.loader.load_state(),
    }))
}

// ============================================================================
// Surface state and actions
// ============================================================================

pub async fn get_state(State(state): State<SurfaceAppState>) -> impl IntoResponse {
    Json(state.controller.snapshot())
}

#[derive(Debug, Deserialize)]
pub struct InputRequest {
    pub text: String,
}

pub async fn update_input(
    State(state): State<SurfaceAppState>,
    Json(req): Json<InputRequest>,
) -> impl IntoResponse {
    state.controller.on_input_change(req.text);
    Json(state.controller.snapshot())
}

pub async fn analyze(State(state): State<SurfaceAppState>) -> Result<Response, ApiError> {
    let outcome = state.controller.on_analyze().await;

    if let AnalyzeOutcome::Rejected { reason } = outcome {
        return Err(rejected(reason));
    }

    Ok(Json(serde_json::json!({
        "outcome": outcome,
        "state": state.controller.snapshot(),
    }))
    .into_response())
}

pub async fn clear(State(state): State<SurfaceAppState>) -> impl IntoResponse {
    state.controller.on_clear();
    Json(state.controller.snapshot())
}

fn rejected(reason: RejectReason) -> ApiError {
    ApiError::Rejected(Notice::rejected(reason))
}
