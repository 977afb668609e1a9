//! Settings endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use receipt_core::{Settings, SettingsPatch};

use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /api/settings`
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<Json<Settings>> {
    Ok(Json(state.settings().await?))
}

/// `PUT /api/settings`: fields missing from the body keep their value.
pub async fn update_settings(
    State(state): State<AppState>,
    payload: Result<Json<SettingsPatch>, JsonRejection>,
) -> ApiResult<Json<Settings>> {
    let Json(patch) = payload?;

    let settings = state
        .db()
        .settings()
        .update(patch, &state.default_output_folder())
        .await?;

    Ok(Json(settings))
}
