//! Monthly report repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::MonthlyReport;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MonthlyReportRepository: Send + Sync {
    /// One row per (contract, month, year); regenerating overwrites it.
    async fn upsert(&self, report: &MonthlyReport) -> Result<MonthlyReport, DomainError>;
    async fn list_by_company(&self, company_id: &Uuid, month: Option<i32>, year: Option<i32>) -> Result<Vec<MonthlyReport>, DomainError>;
}
