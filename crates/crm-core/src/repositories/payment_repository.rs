//! Payment repository trait (port)

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use crm_shared::Pagination;
use crate::domain::{Payment, PaymentStatus};
use crate::error::DomainError;

/// Optional filters for payment listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentFilter {
    pub contract_id: Option<Uuid>,
    pub status: Option<PaymentStatus>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl PaymentFilter {
    pub fn pagination(&self) -> Pagination {
        let defaults = Pagination::default();
        Pagination {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn list_by_company(&self, company_id: &Uuid, filter: &PaymentFilter) -> Result<Vec<Payment>, DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Payment>, DomainError>;
    async fn update(&self, payment: &Payment) -> Result<Payment, DomainError>;
    /// Pending payments (all companies) due strictly before `date`.
    async fn list_pending_due_before(&self, date: NaiveDate) -> Result<Vec<Payment>, DomainError>;
    /// Pending payments (all companies) due in `[from, to]`.
    async fn list_pending_due_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Payment>, DomainError>;
    async fn list_by_contract(&self, contract_id: &Uuid) -> Result<Vec<Payment>, DomainError>;
    async fn list_by_tenant(&self, tenant_id: &Uuid) -> Result<Vec<Payment>, DomainError>;
    async fn list_by_contract_in_month(&self, contract_id: &Uuid, month: i32, year: i32) -> Result<Vec<Payment>, DomainError>;
}
