//! Notification repository trait (port)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use crm_shared::Pagination;
use crate::domain::Notification;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Inserts unless an equivalent notification (same user, kind and linked
    /// records) was created at or after `since`. Returns whether it inserted.
    async fn insert_if_absent(&self, notification: &Notification, since: DateTime<Utc>) -> Result<bool, DomainError>;
    async fn list_for_user(&self, user_id: &Uuid, unread_only: bool, page: &Pagination) -> Result<Vec<Notification>, DomainError>;
    async fn unread_count(&self, user_id: &Uuid) -> Result<i64, DomainError>;
    async fn mark_read(&self, user_id: &Uuid, id: &Uuid) -> Result<bool, DomainError>;
    async fn mark_all_read(&self, user_id: &Uuid) -> Result<u64, DomainError>;
    async fn delete(&self, user_id: &Uuid, id: &Uuid) -> Result<bool, DomainError>;
}
