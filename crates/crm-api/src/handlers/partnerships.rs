//! Broker partnership handlers

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crm_core::PartnershipNotification;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::CurrentUser;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub accept: bool,
}

#[derive(Debug, Serialize)]
pub struct DetectResponse {
    pub created: usize,
}

/// Partnerships the caller proposed or received.
pub async fn list_partnerships(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<ApiResponse<Vec<PartnershipNotification>>>, ApiError> {
    Ok(ok(state.partnerships.list_for_user(&actor).await?))
}

pub async fn detect_partnerships(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<ApiResponse<DetectResponse>>, ApiError> {
    let created = state.partnerships.detect_for_user(&actor).await?;
    Ok(ok(DetectResponse { created }))
}

pub async fn respond_partnership(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<RespondRequest>,
) -> Result<Json<ApiResponse<PartnershipNotification>>, ApiError> {
    Ok(ok(state.partnerships.respond(&actor, &id, payload.accept).await?))
}
