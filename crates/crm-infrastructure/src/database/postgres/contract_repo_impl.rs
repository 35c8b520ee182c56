// ============================================================================
// CRM Infrastructure - PostgreSQL Contract Repository
// File: crates/crm-infrastructure/src/database/postgres/contract_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crm_core::domain::{Contract, ContractStatus, Payment, PaymentStatus, PropertyStatus};
use crm_core::error::DomainError;
use crm_core::repositories::ContractRepository;
use crm_shared::{Cents, Pagination};

use super::{db_error, parse_enum, unique_violation};

const CONTRACT_COLUMNS: &str = "id, company_id, user_id, property_id, tenant_id, start_date, end_date, \
    rent_cents, deposit_cents, due_day, admin_fee_percent, late_fee_percent, daily_interest_percent, \
    status, document_text, created_at, modified_at";

pub struct PgContractRepository {
    pool: PgPool,
}

impl PgContractRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ContractRow {
    id: Uuid,
    company_id: Uuid,
    user_id: Uuid,
    property_id: Uuid,
    tenant_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    rent_cents: Cents,
    deposit_cents: Option<Cents>,
    due_day: i32,
    admin_fee_percent: f64,
    late_fee_percent: f64,
    daily_interest_percent: f64,
    status: String,
    document_text: Option<String>,
    created_at: DateTime<Utc>,
    modified_at: Option<DateTime<Utc>>,
}

impl TryFrom<ContractRow> for Contract {
    type Error = DomainError;

    fn try_from(row: ContractRow) -> Result<Self, Self::Error> {
        Ok(Contract {
            id: row.id,
            company_id: row.company_id,
            user_id: row.user_id,
            property_id: row.property_id,
            tenant_id: row.tenant_id,
            start_date: row.start_date,
            end_date: row.end_date,
            rent_cents: row.rent_cents,
            deposit_cents: row.deposit_cents,
            due_day: row.due_day,
            admin_fee_percent: row.admin_fee_percent,
            late_fee_percent: row.late_fee_percent,
            daily_interest_percent: row.daily_interest_percent,
            status: parse_enum("contract status", &row.status, ContractStatus::from_str)?,
            document_text: row.document_text,
            created_at: row.created_at,
            modified_at: row.modified_at,
        })
    }
}

fn into_contracts(rows: Vec<ContractRow>) -> Result<Vec<Contract>, DomainError> {
    rows.into_iter().map(TryInto::try_into).collect()
}

#[async_trait]
impl ContractRepository for PgContractRepository {
    async fn list_by_company(&self, company_id: &Uuid, page: &Pagination) -> Result<Vec<Contract>, DomainError> {
        let rows: Vec<ContractRow> = sqlx::query_as(&format!(
            "SELECT {} FROM contracts WHERE company_id = $1 ORDER BY start_date DESC LIMIT $2 OFFSET $3",
            CONTRACT_COLUMNS
        ))
        .bind(company_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing contracts", e))?;

        into_contracts(rows)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Contract>, DomainError> {
        let row: Option<ContractRow> = sqlx::query_as(&format!("SELECT {} FROM contracts WHERE id = $1", CONTRACT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding contract", e))?;

        row.map(TryInto::try_into).transpose()
    }

    /// Inserts the contract and its payments and marks the property rented,
    /// all in one transaction.
    async fn create_with_schedule(&self, contract: &Contract, payments: &[Payment]) -> Result<Contract, DomainError> {
        let mut tx = self.pool.begin().await
            .map_err(|e| db_error("starting contract creation", e))?;

        let row: ContractRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO contracts ({cols})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {cols}
            "#,
            cols = CONTRACT_COLUMNS
        ))
        .bind(contract.id)
        .bind(contract.company_id)
        .bind(contract.user_id)
        .bind(contract.property_id)
        .bind(contract.tenant_id)
        .bind(contract.start_date)
        .bind(contract.end_date)
        .bind(contract.rent_cents)
        .bind(contract.deposit_cents)
        .bind(contract.due_day)
        .bind(contract.admin_fee_percent)
        .bind(contract.late_fee_percent)
        .bind(contract.daily_interest_percent)
        .bind(contract.status.as_str())
        .bind(&contract.document_text)
        .bind(contract.created_at)
        .bind(contract.modified_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if unique_violation(&e).is_some() {
                DomainError::Conflict("Property already has an active contract".to_string())
            } else {
                db_error("creating contract", e)
            }
        })?;

        for payment in payments {
            sqlx::query(
                r#"
                INSERT INTO payments (id, company_id, contract_id, due_date, amount_cents, status,
                                      late_fee_cents, interest_cents, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(payment.id)
            .bind(payment.company_id)
            .bind(payment.contract_id)
            .bind(payment.due_date)
            .bind(payment.amount_cents)
            .bind(payment.status.as_str())
            .bind(payment.late_fee_cents)
            .bind(payment.interest_cents)
            .bind(payment.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("creating payment schedule", e))?;
        }

        sqlx::query("UPDATE properties SET status = $2, modified_at = NOW() WHERE id = $1")
            .bind(contract.property_id)
            .bind(PropertyStatus::Rented.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("marking property rented", e))?;

        tx.commit().await.map_err(|e| db_error("committing contract", e))?;
        info!("Contract {} stored with {} payments", contract.id, payments.len());

        row.try_into()
    }

    async fn update(&self, contract: &Contract) -> Result<Contract, DomainError> {
        let row: ContractRow = sqlx::query_as(&format!(
            r#"
            UPDATE contracts
            SET end_date = $2, rent_cents = $3, due_day = $4, admin_fee_percent = $5,
                late_fee_percent = $6, daily_interest_percent = $7, status = $8,
                document_text = $9, modified_at = $10
            WHERE id = $1
            RETURNING {}
            "#,
            CONTRACT_COLUMNS
        ))
        .bind(contract.id)
        .bind(contract.end_date)
        .bind(contract.rent_cents)
        .bind(contract.due_day)
        .bind(contract.admin_fee_percent)
        .bind(contract.late_fee_percent)
        .bind(contract.daily_interest_percent)
        .bind(contract.status.as_str())
        .bind(&contract.document_text)
        .bind(contract.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("updating contract", e))?;

        row.try_into()
    }

    /// Status change, payment cancellation and property release commit or
    /// roll back together.
    async fn terminate(&self, contract: &Contract, cancel_after: NaiveDate) -> Result<(Contract, u64), DomainError> {
        let mut tx = self.pool.begin().await
            .map_err(|e| db_error("starting contract termination", e))?;

        let row: ContractRow = sqlx::query_as(&format!(
            "UPDATE contracts SET status = $2, modified_at = $3 WHERE id = $1 RETURNING {}",
            CONTRACT_COLUMNS
        ))
        .bind(contract.id)
        .bind(contract.status.as_str())
        .bind(contract.modified_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("terminating contract", e))?;

        let cancelled = sqlx::query(
            r#"
            UPDATE payments
            SET status = $3, modified_at = NOW()
            WHERE contract_id = $1 AND due_date > $2 AND status IN ($4, $5)
            "#,
        )
        .bind(contract.id)
        .bind(cancel_after)
        .bind(PaymentStatus::Cancelled.as_str())
        .bind(PaymentStatus::Pending.as_str())
        .bind(PaymentStatus::Overdue.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("cancelling open payments", e))?
        .rows_affected();

        sqlx::query("UPDATE properties SET status = $2, modified_at = NOW() WHERE id = $1 AND status = $3")
            .bind(contract.property_id)
            .bind(PropertyStatus::Available.as_str())
            .bind(PropertyStatus::Rented.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("releasing property", e))?;

        tx.commit().await.map_err(|e| db_error("committing contract termination", e))?;
        info!("Contract {} terminated with {} payments cancelled", contract.id, cancelled);

        Ok((row.try_into()?, cancelled))
    }

    async fn list_by_tenant(&self, tenant_id: &Uuid) -> Result<Vec<Contract>, DomainError> {
        let rows: Vec<ContractRow> = sqlx::query_as(&format!(
            "SELECT {} FROM contracts WHERE tenant_id = $1 ORDER BY start_date",
            CONTRACT_COLUMNS
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing tenant contracts", e))?;

        into_contracts(rows)
    }

    async fn list_all_by_company(&self, company_id: &Uuid) -> Result<Vec<Contract>, DomainError> {
        let rows: Vec<ContractRow> = sqlx::query_as(&format!(
            "SELECT {} FROM contracts WHERE company_id = $1 ORDER BY start_date",
            CONTRACT_COLUMNS
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing company contracts", e))?;

        into_contracts(rows)
    }

    async fn list_active_ending_by(&self, date: NaiveDate) -> Result<Vec<Contract>, DomainError> {
        let rows: Vec<ContractRow> = sqlx::query_as(&format!(
            "SELECT {} FROM contracts WHERE status = $1 AND end_date <= $2 ORDER BY end_date",
            CONTRACT_COLUMNS
        ))
        .bind(ContractStatus::Active.as_str())
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing ending contracts", e))?;

        into_contracts(rows)
    }

    async fn count_by_property(&self, property_id: &Uuid) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM contracts WHERE property_id = $1")
            .bind(property_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting property contracts", e))
    }
}
