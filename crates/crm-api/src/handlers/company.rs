//! Company profile handlers

use axum::extract::State;
use axum::Json;

use crm_core::{Company, CompanyInput};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::middleware::CurrentUser;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

pub async fn get_company(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<ApiResponse<Company>>, ApiError> {
    Ok(ok(state.company.get(&actor).await?))
}

pub async fn update_company(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiJson(payload): ApiJson<CompanyInput>,
) -> Result<Json<ApiResponse<Company>>, ApiError> {
    Ok(ok(state.company.update(&actor, payload).await?))
}
