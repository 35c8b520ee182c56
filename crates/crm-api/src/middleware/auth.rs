//! Authenticated-user extractor
//!
//! Accepts `Authorization: Bearer <token>` first, then the session cookie.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use tracing::debug;

use crm_core::services::Actor;
use crm_core::UserRole;

use crate::error::ApiError;
use crate::state::AppState;

/// The caller, resolved from a valid access token.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Actor);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn invalid_token() -> ApiError {
    ApiError::Unauthorized("Invalid or expired token".to_string())
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = match bearer_token(parts) {
            Some(token) => token,
            None => parts
                .headers
                .get(COOKIE)
                .and_then(|value| value.to_str().ok())
                .and_then(|header| state.session_cookie.read(header))
                .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?,
        };

        let claims = state.jwt.validate_token(token).map_err(|e| {
            debug!("Rejected access token: {}", e);
            invalid_token()
        })?;

        Ok(CurrentUser(Actor {
            user_id: claims.user_id().map_err(|_| invalid_token())?,
            company_id: claims.company_id().map_err(|_| invalid_token())?,
            role: UserRole::from_str(&claims.role).ok_or_else(invalid_token)?,
        }))
    }
}
