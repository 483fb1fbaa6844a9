use axum::extract::State;
use axum::Json;
use storage::{ConfigUpdate, Configuration};
use tracing::info;

use crate::api::{ApiError, ApiResult, AppState};

// GET /api/config
pub async fn get_config(State(state): State<AppState>) -> Json<Configuration> {
    Json(state.config().await)
}

// PUT /api/config
pub async fn update_config(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<Json<Configuration>> {
    let update =
        ConfigUpdate::from_json(body).map_err(|e| ApiError::bad_request(e.to_string()))?;
    let config = state.update_config(&update).await?;
    info!(model = %config.model_name, context_limit = config.context_limit, "Config updated via API");
    Ok(Json(config))
}
