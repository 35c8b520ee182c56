//! Per-user settings handlers

use axum::extract::State;
use axum::Json;

use crm_core::domain::settings::SettingsInput;
use crm_core::Settings;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::middleware::CurrentUser;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

pub async fn get_settings(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<ApiResponse<Settings>>, ApiError> {
    Ok(ok(state.settings.get(&actor).await?))
}

pub async fn update_settings(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiJson(payload): ApiJson<SettingsInput>,
) -> Result<Json<ApiResponse<Settings>>, ApiError> {
    Ok(ok(state.settings.update(&actor, payload).await?))
}
