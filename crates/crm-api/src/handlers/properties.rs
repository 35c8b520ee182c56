//! Property handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crm_core::domain::property::PropertyInput;
use crm_core::Property;
use crm_shared::Pagination;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

pub async fn list_properties(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<ApiResponse<Vec<Property>>>, ApiError> {
    Ok(ok(state.properties.list(&actor, &page).await?))
}

pub async fn get_property(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Property>>, ApiError> {
    Ok(ok(state.properties.get(&actor, &id).await?))
}

pub async fn create_property(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiJson(payload): ApiJson<PropertyInput>,
) -> Result<(StatusCode, Json<ApiResponse<Property>>), ApiError> {
    let created = state.properties.create(&actor, payload).await?;
    Ok((StatusCode::CREATED, ok(created)))
}

pub async fn update_property(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<PropertyInput>,
) -> Result<Json<ApiResponse<Property>>, ApiError> {
    Ok(ok(state.properties.update(&actor, &id, payload).await?))
}

pub async fn delete_property(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.properties.delete(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
