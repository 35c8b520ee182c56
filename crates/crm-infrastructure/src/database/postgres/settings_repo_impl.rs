// ============================================================================
// CRM Infrastructure - PostgreSQL Settings Repository
// File: crates/crm-infrastructure/src/database/postgres/settings_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crm_core::domain::Settings;
use crm_core::error::DomainError;
use crm_core::repositories::SettingsRepository;

use super::db_error;

pub struct PgSettingsRepository {
    pool: PgPool,
}

impl PgSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SettingsRow {
    user_id: Uuid,
    company_id: Uuid,
    reminder_days_before: i32,
    partnerships_enabled: bool,
    lead_match_notifications: bool,
    updated_at: DateTime<Utc>,
}

impl From<SettingsRow> for Settings {
    fn from(row: SettingsRow) -> Self {
        Settings {
            user_id: row.user_id,
            company_id: row.company_id,
            reminder_days_before: row.reminder_days_before,
            partnerships_enabled: row.partnerships_enabled,
            lead_match_notifications: row.lead_match_notifications,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl SettingsRepository for PgSettingsRepository {
    async fn find_by_user(&self, user_id: &Uuid) -> Result<Option<Settings>, DomainError> {
        let row: Option<SettingsRow> = sqlx::query_as(
            r#"
            SELECT user_id, company_id, reminder_days_before, partnerships_enabled,
                   lead_match_notifications, updated_at
            FROM settings
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding settings", e))?;

        Ok(row.map(Into::into))
    }

    async fn upsert(&self, settings: &Settings) -> Result<Settings, DomainError> {
        let row: SettingsRow = sqlx::query_as(
            r#"
            INSERT INTO settings (user_id, company_id, reminder_days_before, partnerships_enabled,
                                  lead_match_notifications, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO UPDATE
            SET reminder_days_before = EXCLUDED.reminder_days_before,
                partnerships_enabled = EXCLUDED.partnerships_enabled,
                lead_match_notifications = EXCLUDED.lead_match_notifications,
                updated_at = EXCLUDED.updated_at
            RETURNING user_id, company_id, reminder_days_before, partnerships_enabled,
                      lead_match_notifications, updated_at
            "#,
        )
        .bind(settings.user_id)
        .bind(settings.company_id)
        .bind(settings.reminder_days_before)
        .bind(settings.partnerships_enabled)
        .bind(settings.lead_match_notifications)
        .bind(settings.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("saving settings", e))?;

        Ok(row.into())
    }
}
