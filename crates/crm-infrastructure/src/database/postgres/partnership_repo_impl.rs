// ============================================================================
// CRM Infrastructure - PostgreSQL Partnership Repository
// File: crates/crm-infrastructure/src/database/postgres/partnership_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crm_core::domain::{PartnershipNotification, PartnershipStatus};
use crm_core::error::DomainError;
use crm_core::repositories::PartnershipRepository;

use super::{db_error, parse_enum};

const PARTNERSHIP_COLUMNS: &str = "id, lead_id, property_id, from_user_id, to_user_id, status, message, \
    created_at, responded_at";

pub struct PgPartnershipRepository {
    pool: PgPool,
}

impl PgPartnershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PartnershipRow {
    id: Uuid,
    lead_id: Uuid,
    property_id: Uuid,
    from_user_id: Uuid,
    to_user_id: Uuid,
    status: String,
    message: String,
    created_at: DateTime<Utc>,
    responded_at: Option<DateTime<Utc>>,
}

impl TryFrom<PartnershipRow> for PartnershipNotification {
    type Error = DomainError;

    fn try_from(row: PartnershipRow) -> Result<Self, Self::Error> {
        Ok(PartnershipNotification {
            id: row.id,
            lead_id: row.lead_id,
            property_id: row.property_id,
            from_user_id: row.from_user_id,
            to_user_id: row.to_user_id,
            status: parse_enum("partnership status", &row.status, PartnershipStatus::from_str)?,
            message: row.message,
            created_at: row.created_at,
            responded_at: row.responded_at,
        })
    }
}

#[async_trait]
impl PartnershipRepository for PgPartnershipRepository {
    async fn insert_if_absent(&self, partnership: &PartnershipNotification) -> Result<bool, DomainError> {
        let result = sqlx::query(&format!(
            r#"
            INSERT INTO partnership_notifications ({})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT ON CONSTRAINT partnership_pair_key DO NOTHING
            "#,
            PARTNERSHIP_COLUMNS
        ))
        .bind(partnership.id)
        .bind(partnership.lead_id)
        .bind(partnership.property_id)
        .bind(partnership.from_user_id)
        .bind(partnership.to_user_id)
        .bind(partnership.status.as_str())
        .bind(&partnership.message)
        .bind(partnership.created_at)
        .bind(partnership.responded_at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("inserting partnership", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_for_user(&self, user_id: &Uuid) -> Result<Vec<PartnershipNotification>, DomainError> {
        let rows: Vec<PartnershipRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM partnership_notifications
            WHERE from_user_id = $1 OR to_user_id = $1
            ORDER BY created_at DESC
            "#,
            PARTNERSHIP_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing partnerships", e))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<PartnershipNotification>, DomainError> {
        let row: Option<PartnershipRow> = sqlx::query_as(&format!(
            "SELECT {} FROM partnership_notifications WHERE id = $1",
            PARTNERSHIP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding partnership", e))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn update(&self, partnership: &PartnershipNotification) -> Result<PartnershipNotification, DomainError> {
        let row: PartnershipRow = sqlx::query_as(&format!(
            r#"
            UPDATE partnership_notifications
            SET status = $2, responded_at = $3
            WHERE id = $1
            RETURNING {}
            "#,
            PARTNERSHIP_COLUMNS
        ))
        .bind(partnership.id)
        .bind(partnership.status.as_str())
        .bind(partnership.responded_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("updating partnership", e))?;

        row.try_into()
    }
}
