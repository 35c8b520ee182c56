//! OLX marketplace export and inbound lead webhook

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use tracing::{info, warn};

use crm_core::services::{OlxLeadPayload, OlxListing};
use crm_core::Lead;

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

pub const SIGNATURE_HEADER: &str = "x-signature";
pub const TIMESTAMP_HEADER: &str = "x-timestamp";

/// GET /api/marketplace/olx/export
pub async fn export_olx(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<ApiResponse<Vec<OlxListing>>>, ApiError> {
    Ok(ok(state.marketplace.export_listings(&actor).await?))
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// POST /api/webhooks/olx
///
/// The signature covers the raw body, so it is verified before parsing.
pub async fn olx_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<Lead>>), ApiError> {
    let unauthorized = || ApiError::Unauthorized("Invalid webhook signature".to_string());

    let signature = header(&headers, SIGNATURE_HEADER).ok_or_else(unauthorized)?;
    let timestamp = header(&headers, TIMESTAMP_HEADER)
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(unauthorized)?;

    if let Err(e) = state.webhook_signer.verify(timestamp, &body, signature) {
        warn!("Rejected OLX webhook: {}", e);
        return Err(unauthorized());
    }

    let payload: OlxLeadPayload = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid payload: {}", e)))?;

    let lead = state.marketplace.ingest_lead(payload).await?;
    info!("OLX lead {} ingested", lead.id);
    Ok((StatusCode::CREATED, ok(lead)))
}
