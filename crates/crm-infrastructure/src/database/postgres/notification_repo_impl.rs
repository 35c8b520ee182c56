// ============================================================================
// CRM Infrastructure - PostgreSQL Notification Repository
// File: crates/crm-infrastructure/src/database/postgres/notification_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crm_core::domain::{Notification, NotificationKind};
use crm_core::error::DomainError;
use crm_core::repositories::NotificationRepository;
use crm_shared::Pagination;

use super::{db_error, parse_enum};

const NOTIFICATION_COLUMNS: &str = "id, company_id, user_id, kind, title, message, lead_id, property_id, \
    contract_id, payment_id, read_at, created_at";

pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct NotificationRow {
    id: Uuid,
    company_id: Uuid,
    user_id: Uuid,
    kind: String,
    title: String,
    message: String,
    lead_id: Option<Uuid>,
    property_id: Option<Uuid>,
    contract_id: Option<Uuid>,
    payment_id: Option<Uuid>,
    read_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = DomainError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: row.id,
            company_id: row.company_id,
            user_id: row.user_id,
            kind: parse_enum("notification kind", &row.kind, NotificationKind::from_str)?,
            title: row.title,
            message: row.message,
            lead_id: row.lead_id,
            property_id: row.property_id,
            contract_id: row.contract_id,
            payment_id: row.payment_id,
            read_at: row.read_at,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn insert_if_absent(&self, notification: &Notification, since: DateTime<Utc>) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO notifications (id, company_id, user_id, kind, title, message,
                                       lead_id, property_id, contract_id, payment_id, read_at, created_at)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12
            WHERE NOT EXISTS (
                SELECT 1 FROM notifications n
                WHERE n.user_id = $3
                  AND n.kind = $4
                  AND n.lead_id IS NOT DISTINCT FROM $7
                  AND n.property_id IS NOT DISTINCT FROM $8
                  AND n.contract_id IS NOT DISTINCT FROM $9
                  AND n.payment_id IS NOT DISTINCT FROM $10
                  AND n.created_at >= $13
            )
            "#,
        )
        .bind(notification.id)
        .bind(notification.company_id)
        .bind(notification.user_id)
        .bind(notification.kind.as_str())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.lead_id)
        .bind(notification.property_id)
        .bind(notification.contract_id)
        .bind(notification.payment_id)
        .bind(notification.read_at)
        .bind(notification.created_at)
        .bind(since)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("inserting notification", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_for_user(&self, user_id: &Uuid, unread_only: bool, page: &Pagination) -> Result<Vec<Notification>, DomainError> {
        let rows: Vec<NotificationRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM notifications
            WHERE user_id = $1 AND (NOT $2 OR read_at IS NULL)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
            NOTIFICATION_COLUMNS
        ))
        .bind(user_id)
        .bind(unread_only)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing notifications", e))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn unread_count(&self, user_id: &Uuid) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read_at IS NULL")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting unread notifications", e))
    }

    async fn mark_read(&self, user_id: &Uuid, id: &Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = COALESCE(read_at, NOW()) WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("marking notification read", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, user_id: &Uuid) -> Result<u64, DomainError> {
        let result = sqlx::query("UPDATE notifications SET read_at = NOW() WHERE user_id = $1 AND read_at IS NULL")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("marking notifications read", e))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, user_id: &Uuid, id: &Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting notification", e))?;

        Ok(result.rows_affected() > 0)
    }
}
