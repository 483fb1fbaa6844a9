use axum::extract::{Query, State};
use axum::Json;
use memory::PersonaStore;
use prompt::Profile;
use serde::Deserialize;

use crate::api::{ApiError, ApiResult, AppState, MessageBody};

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    #[serde(default)]
    pub role: String,
    pub profile: Option<Profile>,
}

#[derive(Debug, Deserialize)]
pub struct RoleQuery {
    pub role: Option<String>,
}

// GET /api/profiles
pub async fn list_profiles(State(state): State<AppState>) -> Json<PersonaStore> {
    Json(state.profiles().await)
}

// POST /api/profiles
pub async fn create_profile(
    State(state): State<AppState>,
    Json(body): Json<CreateProfileRequest>,
) -> ApiResult<Json<MessageBody>> {
    let role = body.role.trim();
    let profile = match body.profile {
        Some(profile) if !role.is_empty() => profile,
        _ => return Err(ApiError::bad_request("Role and profile data required")),
    };
    state.save_profile(role, profile).await?;
    Ok(MessageBody::new(format!("Profile added for {}", role)))
}

// DELETE /api/profiles?role=<role>
pub async fn delete_profile(
    State(state): State<AppState>,
    Query(query): Query<RoleQuery>,
) -> ApiResult<Json<MessageBody>> {
    let role = query.role.unwrap_or_default();
    state.remove_profile(&role).await?;
    Ok(MessageBody::new(format!("Profile deleted for {}", role.trim())))
}
