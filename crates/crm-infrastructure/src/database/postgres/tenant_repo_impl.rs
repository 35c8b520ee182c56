// ============================================================================
// CRM Infrastructure - PostgreSQL Tenant Repository
// File: crates/crm-infrastructure/src/database/postgres/tenant_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crm_core::domain::Tenant;
use crm_core::error::DomainError;
use crm_core::repositories::TenantRepository;
use crm_shared::{Cents, Pagination};

use super::{db_error, unique_violation};

const TENANT_COLUMNS: &str = "id, company_id, user_id, name, email, phone, document, \
                              monthly_income_cents, occupation, created_at, modified_at";

pub struct PgTenantRepository {
    pool: PgPool,
}

impl PgTenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TenantRow {
    id: Uuid,
    company_id: Uuid,
    user_id: Uuid,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    document: String,
    monthly_income_cents: Option<Cents>,
    occupation: Option<String>,
    created_at: DateTime<Utc>,
    modified_at: Option<DateTime<Utc>>,
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Tenant {
            id: row.id,
            company_id: row.company_id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            document: row.document,
            monthly_income_cents: row.monthly_income_cents,
            occupation: row.occupation,
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }
}

fn map_write_error(context: &str, tenant: &Tenant, e: sqlx::Error) -> DomainError {
    if unique_violation(&e).is_some() {
        return DomainError::DocumentAlreadyExists(tenant.document.clone());
    }
    db_error(context, e)
}

#[async_trait]
impl TenantRepository for PgTenantRepository {
    async fn list_by_company(&self, company_id: &Uuid, page: &Pagination) -> Result<Vec<Tenant>, DomainError> {
        let rows: Vec<TenantRow> = sqlx::query_as(&format!(
            "SELECT {} FROM tenants WHERE company_id = $1 ORDER BY name LIMIT $2 OFFSET $3",
            TENANT_COLUMNS
        ))
        .bind(company_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing tenants", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Tenant>, DomainError> {
        let row: Option<TenantRow> = sqlx::query_as(&format!("SELECT {} FROM tenants WHERE id = $1", TENANT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding tenant", e))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_document(&self, company_id: &Uuid, document: &str) -> Result<Option<Tenant>, DomainError> {
        let row: Option<TenantRow> = sqlx::query_as(&format!(
            "SELECT {} FROM tenants WHERE company_id = $1 AND document = $2",
            TENANT_COLUMNS
        ))
        .bind(company_id)
        .bind(document)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding tenant by document", e))?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, tenant: &Tenant) -> Result<Tenant, DomainError> {
        let row: TenantRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO tenants ({cols})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {cols}
            "#,
            cols = TENANT_COLUMNS
        ))
        .bind(tenant.id)
        .bind(tenant.company_id)
        .bind(tenant.user_id)
        .bind(&tenant.name)
        .bind(&tenant.email)
        .bind(&tenant.phone)
        .bind(&tenant.document)
        .bind(tenant.monthly_income_cents)
        .bind(&tenant.occupation)
        .bind(tenant.created_at)
        .bind(tenant.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error("creating tenant", tenant, e))?;

        Ok(row.into())
    }

    async fn update(&self, tenant: &Tenant) -> Result<Tenant, DomainError> {
        let row: TenantRow = sqlx::query_as(&format!(
            r#"
            UPDATE tenants
            SET name = $2, email = $3, phone = $4, document = $5,
                monthly_income_cents = $6, occupation = $7, modified_at = $8
            WHERE id = $1
            RETURNING {}
            "#,
            TENANT_COLUMNS
        ))
        .bind(tenant.id)
        .bind(&tenant.name)
        .bind(&tenant.email)
        .bind(&tenant.phone)
        .bind(&tenant.document)
        .bind(tenant.monthly_income_cents)
        .bind(&tenant.occupation)
        .bind(tenant.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error("updating tenant", tenant, e))?;

        Ok(row.into())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting tenant", e))?;
        Ok(())
    }

    async fn count_contracts(&self, tenant_id: &Uuid) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM contracts WHERE tenant_id = $1")
            .bind(tenant_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting tenant contracts", e))
    }
}
