//! Notification service
//!
//! Every notification in the system is created through
//! [`NotificationService::notify_once`].

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crm_shared::constants::NOTIFICATION_DEDUP_HOURS;
use crm_shared::Pagination;

use crate::domain::{NewNotification, Notification};
use crate::error::DomainError;
use crate::repositories::NotificationRepository;

#[derive(Clone)]
pub struct NotificationService {
    repo: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repo: Arc<dyn NotificationRepository>) -> Self {
        Self { repo }
    }

    /// Idempotent within the dedup window. Returns whether a row was inserted.
    pub async fn notify_once(&self, new: NewNotification) -> Result<bool, DomainError> {
        let since = Utc::now() - Duration::hours(NOTIFICATION_DEDUP_HOURS);
        let notification = new.into_notification();
        let inserted = self.repo.insert_if_absent(&notification, since).await?;

        if inserted {
            info!(
                "Notification {} sent to user {}",
                notification.kind.as_str(),
                notification.user_id
            );
        } else {
            debug!(
                "Duplicate {} notification for user {} suppressed",
                notification.kind.as_str(),
                notification.user_id
            );
        }
        Ok(inserted)
    }

    pub async fn list(&self, user_id: &Uuid, unread_only: bool, page: &Pagination) -> Result<Vec<Notification>, DomainError> {
        self.repo.list_for_user(user_id, unread_only, page).await
    }

    pub async fn unread_count(&self, user_id: &Uuid) -> Result<i64, DomainError> {
        self.repo.unread_count(user_id).await
    }

    pub async fn mark_read(&self, user_id: &Uuid, id: &Uuid) -> Result<(), DomainError> {
        if !self.repo.mark_read(user_id, id).await? {
            return Err(DomainError::NotFound("Notification"));
        }
        Ok(())
    }

    pub async fn mark_all_read(&self, user_id: &Uuid) -> Result<u64, DomainError> {
        self.repo.mark_all_read(user_id).await
    }

    pub async fn delete(&self, user_id: &Uuid, id: &Uuid) -> Result<(), DomainError> {
        if !self.repo.delete(user_id, id).await? {
            return Err(DomainError::NotFound("Notification"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NotificationKind;
    use crate::repositories::MockNotificationRepository;
    use mockall::predicate::*;

    #[tokio::test]
    async fn test_notify_once_uses_dedup_window() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_insert_if_absent()
            .withf(|n, since| {
                let window = Utc::now() - *since;
                n.kind == NotificationKind::LeadMatch
                    && window >= Duration::hours(NOTIFICATION_DEDUP_HOURS) - Duration::seconds(5)
                    && window <= Duration::hours(NOTIFICATION_DEDUP_HOURS) + Duration::seconds(5)
            })
            .times(1)
            .returning(|_, _| Ok(true));

        let service = NotificationService::new(Arc::new(repo));
        let new = NewNotification::new(Uuid::new_v4(), Uuid::new_v4(), NotificationKind::LeadMatch, "t", "m")
            .lead(Uuid::new_v4());
        assert!(service.notify_once(new).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_is_not_an_error() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_insert_if_absent().returning(|_, _| Ok(false));

        let service = NotificationService::new(Arc::new(repo));
        let new = NewNotification::new(Uuid::new_v4(), Uuid::new_v4(), NotificationKind::System, "t", "m");
        assert!(!service.notify_once(new).await.unwrap());
    }

    #[tokio::test]
    async fn test_mark_read_missing_is_not_found() {
        let user = Uuid::new_v4();
        let id = Uuid::new_v4();
        let mut repo = MockNotificationRepository::new();
        repo.expect_mark_read()
            .with(eq(user), eq(id))
            .returning(|_, _| Ok(false));

        let service = NotificationService::new(Arc::new(repo));
        assert!(matches!(
            service.mark_read(&user, &id).await,
            Err(DomainError::NotFound(_))
        ));
    }
}
