//! Lease contract handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crm_core::domain::contract::{ContractInput, ContractTermsInput};
use crm_core::Contract;
use crm_shared::Pagination;

use super::today;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

pub async fn list_contracts(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<ApiResponse<Vec<Contract>>>, ApiError> {
    Ok(ok(state.contracts.list(&actor, &page).await?))
}

pub async fn get_contract(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Contract>>, ApiError> {
    Ok(ok(state.contracts.get(&actor, &id).await?))
}

/// Creates the contract together with its payment schedule.
pub async fn create_contract(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiJson(payload): ApiJson<ContractInput>,
) -> Result<(StatusCode, Json<ApiResponse<Contract>>), ApiError> {
    let contract = state.contracts.create(&actor, payload).await?;
    Ok((StatusCode::CREATED, ok(contract)))
}

pub async fn update_contract(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<ContractTermsInput>,
) -> Result<Json<ApiResponse<Contract>>, ApiError> {
    Ok(ok(state.contracts.update(&actor, &id, payload).await?))
}

pub async fn terminate_contract(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Contract>>, ApiError> {
    Ok(ok(state.contracts.terminate(&actor, &id, today()).await?))
}

/// Renders the lease text and stores it on the contract.
pub async fn generate_document(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Contract>>, ApiError> {
    Ok(ok(state.contracts.generate_document(&actor, &id).await?))
}
