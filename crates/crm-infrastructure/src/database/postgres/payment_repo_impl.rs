// ============================================================================
// CRM Infrastructure - PostgreSQL Payment Repository
// File: crates/crm-infrastructure/src/database/postgres/payment_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crm_core::domain::{Payment, PaymentStatus};
use crm_core::error::DomainError;
use crm_core::repositories::{PaymentFilter, PaymentRepository};
use crm_shared::Cents;

use super::{db_error, parse_enum};

const PAYMENT_COLUMNS: &str = "pay.id, pay.company_id, pay.contract_id, pay.due_date, pay.amount_cents, \
    pay.status, pay.paid_at, pay.paid_amount_cents, pay.late_fee_cents, pay.interest_cents, pay.notes, \
    pay.created_at, pay.modified_at";

pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PaymentRow {
    id: Uuid,
    company_id: Uuid,
    contract_id: Uuid,
    due_date: NaiveDate,
    amount_cents: Cents,
    status: String,
    paid_at: Option<NaiveDate>,
    paid_amount_cents: Option<Cents>,
    late_fee_cents: Cents,
    interest_cents: Cents,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    modified_at: Option<DateTime<Utc>>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: row.id,
            company_id: row.company_id,
            contract_id: row.contract_id,
            due_date: row.due_date,
            amount_cents: row.amount_cents,
            status: parse_enum("payment status", &row.status, PaymentStatus::from_str)?,
            paid_at: row.paid_at,
            paid_amount_cents: row.paid_amount_cents,
            late_fee_cents: row.late_fee_cents,
            interest_cents: row.interest_cents,
            notes: row.notes,
            created_at: row.created_at,
            modified_at: row.modified_at,
        })
    }
}

fn into_payments(rows: Vec<PaymentRow>) -> Result<Vec<Payment>, DomainError> {
    rows.into_iter().map(TryInto::try_into).collect()
}

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    async fn list_by_company(&self, company_id: &Uuid, filter: &PaymentFilter) -> Result<Vec<Payment>, DomainError> {
        let page = filter.pagination();
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM payments pay
            WHERE pay.company_id = $1
              AND ($2::uuid IS NULL OR pay.contract_id = $2)
              AND ($3::text IS NULL OR pay.status = $3)
            ORDER BY pay.due_date DESC
            LIMIT $4 OFFSET $5
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(company_id)
        .bind(filter.contract_id)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing payments", e))?;

        into_payments(rows)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!("SELECT {} FROM payments pay WHERE pay.id = $1", PAYMENT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding payment", e))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn update(&self, payment: &Payment) -> Result<Payment, DomainError> {
        let row: PaymentRow = sqlx::query_as(&format!(
            r#"
            UPDATE payments AS pay
            SET due_date = $2, amount_cents = $3, status = $4, paid_at = $5, paid_amount_cents = $6,
                late_fee_cents = $7, interest_cents = $8, notes = $9, modified_at = $10
            WHERE pay.id = $1
            RETURNING {}
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(payment.id)
        .bind(payment.due_date)
        .bind(payment.amount_cents)
        .bind(payment.status.as_str())
        .bind(payment.paid_at)
        .bind(payment.paid_amount_cents)
        .bind(payment.late_fee_cents)
        .bind(payment.interest_cents)
        .bind(&payment.notes)
        .bind(payment.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("updating payment", e))?;

        row.try_into()
    }

    async fn list_pending_due_before(&self, date: NaiveDate) -> Result<Vec<Payment>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM payments pay WHERE pay.status = $1 AND pay.due_date < $2 ORDER BY pay.due_date",
            PAYMENT_COLUMNS
        ))
        .bind(PaymentStatus::Pending.as_str())
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing late payments", e))?;

        into_payments(rows)
    }

    async fn list_pending_due_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Payment>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM payments pay WHERE pay.status = $1 AND pay.due_date BETWEEN $2 AND $3 ORDER BY pay.due_date",
            PAYMENT_COLUMNS
        ))
        .bind(PaymentStatus::Pending.as_str())
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing upcoming payments", e))?;

        into_payments(rows)
    }

    async fn list_by_contract(&self, contract_id: &Uuid) -> Result<Vec<Payment>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM payments pay WHERE pay.contract_id = $1 ORDER BY pay.due_date",
            PAYMENT_COLUMNS
        ))
        .bind(contract_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing contract payments", e))?;

        into_payments(rows)
    }

    async fn list_by_tenant(&self, tenant_id: &Uuid) -> Result<Vec<Payment>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM payments pay
            JOIN contracts c ON c.id = pay.contract_id
            WHERE c.tenant_id = $1
            ORDER BY pay.due_date
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing tenant payments", e))?;

        into_payments(rows)
    }

    async fn list_by_contract_in_month(&self, contract_id: &Uuid, month: i32, year: i32) -> Result<Vec<Payment>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM payments pay
            WHERE pay.contract_id = $1
              AND EXTRACT(MONTH FROM pay.due_date)::int = $2
              AND EXTRACT(YEAR FROM pay.due_date)::int = $3
            ORDER BY pay.due_date
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(contract_id)
        .bind(month)
        .bind(year)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing monthly payments", e))?;

        into_payments(rows)
    }
}
