//! Payment handlers and the manual reminder trigger

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::info;
use uuid::Uuid;

use crm_core::repositories::PaymentFilter;
use crm_core::services::{PayInput, PaymentUpdateInput, ReminderSummary};
use crm_core::Payment;

use super::{require_admin, today};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

/// GET /api/payments?contract_id=&status=&page=&per_page=
pub async fn list_payments(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiQuery(filter): ApiQuery<PaymentFilter>,
) -> Result<Json<ApiResponse<Vec<Payment>>>, ApiError> {
    Ok(ok(state.payments.list(&actor, &filter).await?))
}

pub async fn get_payment(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Payment>>, ApiError> {
    Ok(ok(state.payments.get(&actor, &id).await?))
}

pub async fn update_payment(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<PaymentUpdateInput>,
) -> Result<Json<ApiResponse<Payment>>, ApiError> {
    Ok(ok(state.payments.update(&actor, &id, payload).await?))
}

/// Settles the payment, computing late fee and interest for today.
pub async fn pay_payment(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    payload: Result<Json<PayInput>, JsonRejection>,
) -> Result<Json<ApiResponse<Payment>>, ApiError> {
    // The body is optional; only a JSON body that fails to parse is rejected.
    let input = match payload {
        Ok(Json(input)) => input,
        Err(JsonRejection::MissingJsonContentType(_)) => PayInput::default(),
        Err(rejection) => return Err(rejection.into()),
    };
    Ok(ok(state.payments.pay(&actor, &id, input, today()).await?))
}

pub async fn cancel_payment(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Payment>>, ApiError> {
    Ok(ok(state.payments.cancel(&actor, &id).await?))
}

/// POST /api/payments/reminders/run (admin only)
pub async fn run_reminders(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<ApiResponse<ReminderSummary>>, ApiError> {
    require_admin(&actor)?;
    info!("Reminder run triggered manually by user {}", actor.user_id);
    Ok(ok(state.reminders.run(today()).await?))
}
