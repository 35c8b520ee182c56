//! Monthly owner report handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crm_core::MonthlyReport;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::middleware::CurrentUser;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub month: Option<i32>,
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateReportRequest {
    pub month: i32,
    pub year: i32,
}

pub async fn list_reports(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> Result<Json<ApiResponse<Vec<MonthlyReport>>>, ApiError> {
    Ok(ok(state.reports.list(&actor, query.month, query.year).await?))
}

/// Generates (or regenerates) one report per active contract for the period.
pub async fn generate_reports(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiJson(payload): ApiJson<GenerateReportRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<MonthlyReport>>>), ApiError> {
    let reports = state
        .reports
        .generate_monthly(&actor, payload.month, payload.year)
        .await?;
    Ok((StatusCode::CREATED, ok(reports)))
}
