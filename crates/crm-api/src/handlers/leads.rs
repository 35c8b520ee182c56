//! Lead handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crm_core::domain::lead::LeadInput;
use crm_core::{Lead, Property};
use crm_shared::Pagination;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

pub async fn list_leads(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<ApiResponse<Vec<Lead>>>, ApiError> {
    Ok(ok(state.leads.list(&actor, &page).await?))
}

pub async fn get_lead(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Lead>>, ApiError> {
    Ok(ok(state.leads.get(&actor, &id).await?))
}

pub async fn create_lead(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiJson(payload): ApiJson<LeadInput>,
) -> Result<(StatusCode, Json<ApiResponse<Lead>>), ApiError> {
    let created = state.leads.create(&actor, payload).await?;
    Ok((StatusCode::CREATED, ok(created)))
}

pub async fn update_lead(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<LeadInput>,
) -> Result<Json<ApiResponse<Lead>>, ApiError> {
    Ok(ok(state.leads.update(&actor, &id, payload).await?))
}

pub async fn delete_lead(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.leads.delete(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Available properties visible to the caller that satisfy the lead.
pub async fn lead_matches(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Vec<Property>>>, ApiError> {
    Ok(ok(state.leads.matches(&actor, &id).await?))
}
