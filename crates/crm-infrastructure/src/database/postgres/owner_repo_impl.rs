// ============================================================================
// CRM Infrastructure - PostgreSQL Owner Repository
// File: crates/crm-infrastructure/src/database/postgres/owner_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crm_core::domain::Owner;
use crm_core::error::DomainError;
use crm_core::repositories::OwnerRepository;
use crm_shared::Pagination;

use super::{db_error, unique_violation};

const OWNER_COLUMNS: &str = "id, company_id, user_id, name, email, phone, document, address, \
                             pix_key, notes, created_at, modified_at";

pub struct PgOwnerRepository {
    pool: PgPool,
}

impl PgOwnerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OwnerRow {
    id: Uuid,
    company_id: Uuid,
    user_id: Uuid,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    document: String,
    address: Option<String>,
    pix_key: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    modified_at: Option<DateTime<Utc>>,
}

impl From<OwnerRow> for Owner {
    fn from(row: OwnerRow) -> Self {
        Owner {
            id: row.id,
            company_id: row.company_id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            document: row.document,
            address: row.address,
            pix_key: row.pix_key,
            notes: row.notes,
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }
}

fn map_write_error(context: &str, owner: &Owner, e: sqlx::Error) -> DomainError {
    if unique_violation(&e).is_some() {
        return DomainError::DocumentAlreadyExists(owner.document.clone());
    }
    db_error(context, e)
}

#[async_trait]
impl OwnerRepository for PgOwnerRepository {
    async fn list_by_company(&self, company_id: &Uuid, page: &Pagination) -> Result<Vec<Owner>, DomainError> {
        let rows: Vec<OwnerRow> = sqlx::query_as(&format!(
            "SELECT {} FROM owners WHERE company_id = $1 ORDER BY name LIMIT $2 OFFSET $3",
            OWNER_COLUMNS
        ))
        .bind(company_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing owners", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Owner>, DomainError> {
        let row: Option<OwnerRow> = sqlx::query_as(&format!("SELECT {} FROM owners WHERE id = $1", OWNER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding owner", e))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_document(&self, company_id: &Uuid, document: &str) -> Result<Option<Owner>, DomainError> {
        let row: Option<OwnerRow> = sqlx::query_as(&format!(
            "SELECT {} FROM owners WHERE company_id = $1 AND document = $2",
            OWNER_COLUMNS
        ))
        .bind(company_id)
        .bind(document)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding owner by document", e))?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, owner: &Owner) -> Result<Owner, DomainError> {
        let row: OwnerRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO owners ({cols})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {cols}
            "#,
            cols = OWNER_COLUMNS
        ))
        .bind(owner.id)
        .bind(owner.company_id)
        .bind(owner.user_id)
        .bind(&owner.name)
        .bind(&owner.email)
        .bind(&owner.phone)
        .bind(&owner.document)
        .bind(&owner.address)
        .bind(&owner.pix_key)
        .bind(&owner.notes)
        .bind(owner.created_at)
        .bind(owner.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error("creating owner", owner, e))?;

        Ok(row.into())
    }

    async fn update(&self, owner: &Owner) -> Result<Owner, DomainError> {
        let row: OwnerRow = sqlx::query_as(&format!(
            r#"
            UPDATE owners
            SET name = $2, email = $3, phone = $4, document = $5, address = $6,
                pix_key = $7, notes = $8, modified_at = $9
            WHERE id = $1
            RETURNING {}
            "#,
            OWNER_COLUMNS
        ))
        .bind(owner.id)
        .bind(&owner.name)
        .bind(&owner.email)
        .bind(&owner.phone)
        .bind(&owner.document)
        .bind(&owner.address)
        .bind(&owner.pix_key)
        .bind(&owner.notes)
        .bind(owner.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error("updating owner", owner, e))?;

        Ok(row.into())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM owners WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting owner", e))?;
        Ok(())
    }

    async fn count_properties(&self, owner_id: &Uuid) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM properties WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting owner properties", e))
    }
}
