// ============================================================================
// CRM Infrastructure - PostgreSQL Company Repository
// File: crates/crm-infrastructure/src/database/postgres/company_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crm_core::domain::Company;
use crm_core::error::DomainError;
use crm_core::repositories::CompanyRepository;

use super::db_error;

pub struct PgCompanyRepository {
    pool: PgPool,
}

impl PgCompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CompanyRow {
    id: Uuid,
    name: String,
    document: Option<String>,
    created_at: DateTime<Utc>,
    modified_at: Option<DateTime<Utc>>,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Company {
            id: row.id,
            name: row.name,
            document: row.document,
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }
}

#[async_trait]
impl CompanyRepository for PgCompanyRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Company>, DomainError> {
        let row: Option<CompanyRow> = sqlx::query_as(
            "SELECT id, name, document, created_at, modified_at FROM companies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding company", e))?;

        Ok(row.map(Into::into))
    }

    async fn update(&self, company: &Company) -> Result<Company, DomainError> {
        let row: CompanyRow = sqlx::query_as(
            r#"
            UPDATE companies
            SET name = $2, document = $3, modified_at = $4
            WHERE id = $1
            RETURNING id, name, document, created_at, modified_at
            "#,
        )
        .bind(company.id)
        .bind(&company.name)
        .bind(&company.document)
        .bind(company.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("updating company", e))?;

        Ok(row.into())
    }
}
