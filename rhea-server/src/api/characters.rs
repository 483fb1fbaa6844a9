use axum::extract::{Query, State};
use axum::Json;
use chat_runtime::CurrentCharacters;
use memory::persona::{DEFAULT_ASSISTANT_ROLE, DEFAULT_USER_ROLE};
use serde::Deserialize;

use crate::api::{AppState, SessionQuery};

#[derive(Debug, Deserialize)]
pub struct SelectCharactersRequest {
    #[serde(default = "default_user_role")]
    pub user_role: String,
    #[serde(default = "default_assistant_role")]
    pub assistant_role: String,
}

fn default_user_role() -> String {
    DEFAULT_USER_ROLE.to_string()
}

fn default_assistant_role() -> String {
    DEFAULT_ASSISTANT_ROLE.to_string()
}

// GET /api/characters/current
pub async fn current_characters(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Json<CurrentCharacters> {
    Json(state.current_characters(query.id()).await)
}

// PUT /api/characters/current
pub async fn select_characters(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    Json(body): Json<SelectCharactersRequest>,
) -> Json<CurrentCharacters> {
    Json(
        state
            .select_characters(query.id(), &body.user_role, &body.assistant_role)
            .await,
    )
}
