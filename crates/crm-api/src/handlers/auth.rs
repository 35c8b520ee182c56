// ============================================================================
// CRM API - Auth Handlers
// File: crates/crm-api/src/handlers/auth.rs
// ============================================================================
//! Authentication HTTP handlers (register, login, logout, me)

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crm_core::services::{AuthResult, RegisterInput};
use crm_core::{Company, User};
use crm_shared::utils::mask_email;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::middleware::CurrentUser;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
    pub expires_in: i64,
}

impl From<AuthResult> for AuthResponse {
    fn from(result: AuthResult) -> Self {
        Self {
            user: result.user,
            access_token: result.access_token,
            expires_in: result.expires_in,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
    pub company: Company,
}

fn with_session(state: &AppState, status: StatusCode, result: AuthResult) -> impl IntoResponse {
    let cookie = state.session_cookie.issue(&result.access_token, result.expires_in);
    (
        status,
        [(SET_COOKIE, cookie)],
        Json(ApiResponse::success(AuthResponse::from(result))),
    )
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterInput>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.auth.register(payload).await?;
    Ok(with_session(&state, StatusCode::CREATED, result))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest("Email and password are required".to_string()));
    }

    if state.login_limiter.check_key(&email).is_err() {
        warn!("Login rate limit exceeded for {}", mask_email(&email));
        return Err(ApiError::TooManyRequests(
            "Too many login attempts, try again later".to_string(),
        ));
    }

    let result = state.auth.login(&email, &payload.password).await?;
    Ok(with_session(&state, StatusCode::OK, result))
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(SET_COOKIE, state.session_cookie.clear())],
        Json(ApiResponse::success("Logged out")),
    )
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<ApiResponse<MeResponse>>, ApiError> {
    let user = state.auth.current_user(&actor.user_id).await?;
    let company = state.company.get(&actor).await?;
    Ok(ok(MeResponse { user, company }))
}
