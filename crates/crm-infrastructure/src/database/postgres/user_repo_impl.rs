// ============================================================================
// CRM Infrastructure - PostgreSQL User Repository
// File: crates/crm-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{info, error};
use uuid::Uuid;

use crm_core::domain::{Company, Settings, User, UserRole};
use crm_core::error::DomainError;
use crm_core::repositories::UserRepository;

use super::{db_error, parse_enum, unique_violation};

const USER_COLUMNS: &str = "id, company_id, name, email, password_hash, role, creci, phone, \
                            is_active, last_login_at, created_at, modified_at";

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    company_id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    creci: Option<String>,
    phone: Option<String>,
    is_active: bool,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    modified_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            company_id: row.company_id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role: parse_enum("role", &row.role, UserRole::from_str)?,
            creci: row.creci,
            phone: row.phone,
            is_active: row.is_active,
            last_login_at: row.last_login_at,
            created_at: row.created_at,
            modified_at: row.modified_at,
        })
    }
}

fn map_write_error(context: &str, user: &User, e: sqlx::Error) -> DomainError {
    if unique_violation(&e).is_some() {
        return DomainError::EmailAlreadyExists(user.email.clone());
    }
    db_error(context, e)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding user by id", e))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding user by email", e))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn register(&self, company: &Company, user: &User, settings: &Settings) -> Result<User, DomainError> {
        info!("Registering company {} with admin {}", company.id, user.id);

        let mut tx = self.pool.begin().await
            .map_err(|e| db_error("starting registration", e))?;

        sqlx::query(
            "INSERT INTO companies (id, name, document, created_at, modified_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(company.id)
        .bind(&company.name)
        .bind(&company.document)
        .bind(company.created_at)
        .bind(company.modified_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("creating company", e))?;

        let row: UserRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO users ({cols})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {cols}
            "#,
            cols = USER_COLUMNS
        ))
        .bind(user.id)
        .bind(user.company_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.creci)
        .bind(&user.phone)
        .bind(user.is_active)
        .bind(user.last_login_at)
        .bind(user.created_at)
        .bind(user.modified_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error("creating user", user, e))?;

        sqlx::query(
            r#"
            INSERT INTO settings (user_id, company_id, reminder_days_before, partnerships_enabled,
                                  lead_match_notifications, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(settings.user_id)
        .bind(settings.company_id)
        .bind(settings.reminder_days_before)
        .bind(settings.partnerships_enabled)
        .bind(settings.lead_match_notifications)
        .bind(settings.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("creating settings", e))?;

        tx.commit().await.map_err(|e| {
            error!("Registration commit failed for {}", user.id);
            db_error("committing registration", e)
        })?;

        row.try_into()
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let row: UserRow = sqlx::query_as(&format!(
            r#"
            UPDATE users
            SET name = $2, email = $3, password_hash = $4, role = $5, creci = $6, phone = $7,
                is_active = $8, last_login_at = $9, modified_at = $10
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.creci)
        .bind(&user.phone)
        .bind(user.is_active)
        .bind(user.last_login_at)
        .bind(user.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error("updating user", user, e))?;

        row.try_into()
    }
}
