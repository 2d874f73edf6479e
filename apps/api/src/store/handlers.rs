use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::json;

use crate::errors::AppError;
use crate::models::profile::{MasterResume, UserProfile};
use crate::models::settings::Settings;
use crate::state::AppState;

/// GET /api/v1/settings
pub async fn handle_get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json(state.store.load().settings)
}

/// PUT /api/v1/settings
pub async fn handle_put_settings(
    State(state): State<AppState>,
    Json(settings): Json<Settings>,
) -> StatusCode {
    state.store.update(|data| data.settings = settings);
    StatusCode::NO_CONTENT
}

/// GET /api/v1/profile
pub async fn handle_get_profile(State(state): State<AppState>) -> Json<UserProfile> {
    Json(state.store.load().user_profile)
}

/// PUT /api/v1/profile
pub async fn handle_put_profile(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> StatusCode {
    state.store.update(|data| data.user_profile = profile);
    StatusCode::NO_CONTENT
}

/// GET /api/v1/resume
pub async fn handle_get_resume(State(state): State<AppState>) -> Json<MasterResume> {
    Json(state.store.load().master_resume)
}

/// PUT /api/v1/resume
pub async fn handle_put_resume(
    State(state): State<AppState>,
    Json(mut resume): Json<MasterResume>,
) -> StatusCode {
    resume.last_modified = Utc::now();
    state.store.update(|data| data.master_resume = resume);
    StatusCode::NO_CONTENT
}

/// GET /api/v1/state/export
pub async fn handle_export(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.store.export(),
    )
}

/// POST /api/v1/state/import
/// The body is the raw snapshot text; anything that does not match the
/// aggregate schema is rejected with the specific validation failure.
pub async fn handle_import(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .store
        .import(&body)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(Json(json!({"imported": true})))
}

/// POST /api/v1/state/reset
pub async fn handle_reset(State(state): State<AppState>) -> StatusCode {
    state.store.reset();
    StatusCode::NO_CONTENT
}
