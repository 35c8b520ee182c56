//! In-app notification handlers, always scoped to the calling user

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crm_core::Notification;
use crm_shared::Pagination;

use crate::error::ApiError;
use crate::extract::{ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl NotificationQuery {
    fn pagination(&self) -> Pagination {
        let defaults = Pagination::default();
        Pagination {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationList {
    pub items: Vec<Notification>,
    pub unread_count: i64,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub updated: u64,
}

pub async fn list_notifications(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiQuery(query): ApiQuery<NotificationQuery>,
) -> Result<Json<ApiResponse<NotificationList>>, ApiError> {
    let items = state
        .notifications
        .list(&actor.user_id, query.unread_only, &query.pagination())
        .await?;
    let unread_count = state.notifications.unread_count(&actor.user_id).await?;
    Ok(ok(NotificationList { items, unread_count }))
}

pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.notifications.mark_read(&actor.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<ApiResponse<MarkedRead>>, ApiError> {
    let updated = state.notifications.mark_all_read(&actor.user_id).await?;
    Ok(ok(MarkedRead { updated }))
}

pub async fn delete_notification(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.notifications.delete(&actor.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
