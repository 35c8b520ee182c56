// ============================================================================
// CRM Infrastructure - PostgreSQL Monthly Report Repository
// File: crates/crm-infrastructure/src/database/postgres/monthly_report_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crm_core::domain::MonthlyReport;
use crm_core::error::DomainError;
use crm_core::repositories::MonthlyReportRepository;
use crm_shared::Cents;

use super::db_error;

const REPORT_COLUMNS: &str = "id, company_id, contract_id, month, year, gross_cents, admin_fee_cents, \
    net_cents, payments_paid, payments_overdue, generated_at";

pub struct PgMonthlyReportRepository {
    pool: PgPool,
}

impl PgMonthlyReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MonthlyReportRow {
    id: Uuid,
    company_id: Uuid,
    contract_id: Uuid,
    month: i32,
    year: i32,
    gross_cents: Cents,
    admin_fee_cents: Cents,
    net_cents: Cents,
    payments_paid: i32,
    payments_overdue: i32,
    generated_at: DateTime<Utc>,
}

impl From<MonthlyReportRow> for MonthlyReport {
    fn from(row: MonthlyReportRow) -> Self {
        MonthlyReport {
            id: row.id,
            company_id: row.company_id,
            contract_id: row.contract_id,
            month: row.month,
            year: row.year,
            gross_cents: row.gross_cents,
            admin_fee_cents: row.admin_fee_cents,
            net_cents: row.net_cents,
            payments_paid: row.payments_paid,
            payments_overdue: row.payments_overdue,
            generated_at: row.generated_at,
        }
    }
}

#[async_trait]
impl MonthlyReportRepository for PgMonthlyReportRepository {
    async fn upsert(&self, report: &MonthlyReport) -> Result<MonthlyReport, DomainError> {
        let row: MonthlyReportRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO monthly_reports ({cols})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT ON CONSTRAINT monthly_reports_period_key DO UPDATE
            SET gross_cents = EXCLUDED.gross_cents,
                admin_fee_cents = EXCLUDED.admin_fee_cents,
                net_cents = EXCLUDED.net_cents,
                payments_paid = EXCLUDED.payments_paid,
                payments_overdue = EXCLUDED.payments_overdue,
                generated_at = EXCLUDED.generated_at
            RETURNING {cols}
            "#,
            cols = REPORT_COLUMNS
        ))
        .bind(report.id)
        .bind(report.company_id)
        .bind(report.contract_id)
        .bind(report.month)
        .bind(report.year)
        .bind(report.gross_cents)
        .bind(report.admin_fee_cents)
        .bind(report.net_cents)
        .bind(report.payments_paid)
        .bind(report.payments_overdue)
        .bind(report.generated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("saving monthly report", e))?;

        Ok(row.into())
    }

    async fn list_by_company(&self, company_id: &Uuid, month: Option<i32>, year: Option<i32>) -> Result<Vec<MonthlyReport>, DomainError> {
        let rows: Vec<MonthlyReportRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM monthly_reports
            WHERE company_id = $1
              AND ($2::int IS NULL OR month = $2)
              AND ($3::int IS NULL OR year = $3)
            ORDER BY year DESC, month DESC, contract_id
            "#,
            REPORT_COLUMNS
        ))
        .bind(company_id)
        .bind(month)
        .bind(year)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing monthly reports", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
