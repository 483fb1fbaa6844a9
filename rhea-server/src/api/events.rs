use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{ApiResult, AppState, SessionQuery};

#[derive(Debug, Deserialize)]
pub struct AddEventRequest {
    #[serde(default)]
    pub event: String,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub events: Vec<String>,
}

// GET /api/events
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Json<EventsResponse> {
    Json(EventsResponse {
        message: None,
        events: state.key_events(query.id()).await,
    })
}

// POST /api/events
pub async fn add_event(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    Json(body): Json<AddEventRequest>,
) -> ApiResult<Json<EventsResponse>> {
    let events = state.add_key_event(query.id(), &body.event).await?;
    Ok(Json(EventsResponse {
        message: Some("Event added".to_string()),
        events,
    }))
}
