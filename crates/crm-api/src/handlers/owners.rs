//! Owner (landlord) handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crm_core::domain::owner::OwnerInput;
use crm_core::Owner;
use crm_shared::Pagination;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

pub async fn list_owners(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<ApiResponse<Vec<Owner>>>, ApiError> {
    Ok(ok(state.owners.list(&actor, &page).await?))
}

pub async fn get_owner(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Owner>>, ApiError> {
    Ok(ok(state.owners.get(&actor, &id).await?))
}

pub async fn create_owner(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiJson(payload): ApiJson<OwnerInput>,
) -> Result<(StatusCode, Json<ApiResponse<Owner>>), ApiError> {
    let created = state.owners.create(&actor, payload).await?;
    Ok((StatusCode::CREATED, ok(created)))
}

pub async fn update_owner(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<OwnerInput>,
) -> Result<Json<ApiResponse<Owner>>, ApiError> {
    Ok(ok(state.owners.update(&actor, &id, payload).await?))
}

pub async fn delete_owner(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.owners.delete(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
