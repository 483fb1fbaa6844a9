use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use memory::ContextStatus;
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, ApiResult, AppState, SessionQuery};

#[derive(Debug, Default, Deserialize)]
pub struct TrimRequest {
    pub target_percentage: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct TrimResponse {
    pub message: String,
    pub remaining_messages: usize,
    pub current_usage_percentage: f64,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub message: String,
    pub status: String,
}

// POST /api/clear
pub async fn clear_conversation(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Json<ClearResponse> {
    state.clear(query.id()).await;
    Json(ClearResponse {
        message: "Conversation history cleared".to_string(),
        status: "success".to_string(),
    })
}

// GET /api/context/status
pub async fn context_status(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Json<ContextStatus> {
    Json(state.context_status(query.id()).await)
}

// POST /api/context/trim
//
// The body is optional; an empty body trims to the default percentage.
pub async fn trim_context(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    body: Bytes,
) -> ApiResult<Json<TrimResponse>> {
    let request: TrimRequest = if body.iter().all(u8::is_ascii_whitespace) {
        TrimRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::bad_request(e.to_string()))?
    };
    let report = state.trim_context(query.id(), request.target_percentage).await;
    Ok(Json(TrimResponse {
        message: "Context trimmed successfully".to_string(),
        remaining_messages: report.remaining_messages,
        current_usage_percentage: report.current_usage_percentage,
    }))
}
