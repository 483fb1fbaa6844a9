use axum::extract::{Query, State};
use axum::Json;
use rhea_core::RheaError;

use crate::api::{ApiResult, AppState, MessageBody, SessionQuery};

// DELETE /api/session
//
// Ends a named session and drops its conversation; the next request on the id starts fresh.
pub async fn end_session(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> ApiResult<Json<MessageBody>> {
    if !state.end_session(query.id()).await {
        return Err(RheaError::NotFound("Session not found".to_string()).into());
    }
    Ok(MessageBody::new("Session ended"))
}
