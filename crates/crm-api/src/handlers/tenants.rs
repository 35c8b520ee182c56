//! Tenant handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crm_core::domain::tenant::TenantInput;
use crm_core::services::DelinquencyAssessment;
use crm_core::Tenant;
use crm_shared::Pagination;

use super::today;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

pub async fn list_tenants(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<ApiResponse<Vec<Tenant>>>, ApiError> {
    Ok(ok(state.tenants.list(&actor, &page).await?))
}

pub async fn get_tenant(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Tenant>>, ApiError> {
    Ok(ok(state.tenants.get(&actor, &id).await?))
}

pub async fn create_tenant(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiJson(payload): ApiJson<TenantInput>,
) -> Result<(StatusCode, Json<ApiResponse<Tenant>>), ApiError> {
    let created = state.tenants.create(&actor, payload).await?;
    Ok((StatusCode::CREATED, ok(created)))
}

pub async fn update_tenant(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<TenantInput>,
) -> Result<Json<ApiResponse<Tenant>>, ApiError> {
    Ok(ok(state.tenants.update(&actor, &id, payload).await?))
}

pub async fn delete_tenant(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.tenants.delete(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/tenants/{id}/delinquency
pub async fn tenant_delinquency(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<DelinquencyAssessment>>, ApiError> {
    Ok(ok(state.delinquency.assess(&actor, &id, today()).await?))
}
