//! Contract repository trait (port)

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;
use crm_shared::Pagination;
use crate::domain::{Contract, Payment};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContractRepository: Send + Sync {
    async fn list_by_company(&self, company_id: &Uuid, page: &Pagination) -> Result<Vec<Contract>, DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Contract>, DomainError>;
    /// Inserts the contract, its payment schedule and marks the property
    /// rented in a single transaction.
    async fn create_with_schedule(&self, contract: &Contract, payments: &[Payment]) -> Result<Contract, DomainError>;
    async fn update(&self, contract: &Contract) -> Result<Contract, DomainError>;
    /// Stores the terminated contract, cancels its open payments due after
    /// `cancel_after` and releases a rented property in a single transaction.
    /// Returns the stored contract and the number of cancelled payments.
    async fn terminate(&self, contract: &Contract, cancel_after: NaiveDate) -> Result<(Contract, u64), DomainError>;
    async fn list_by_tenant(&self, tenant_id: &Uuid) -> Result<Vec<Contract>, DomainError>;
    async fn list_all_by_company(&self, company_id: &Uuid) -> Result<Vec<Contract>, DomainError>;
    /// Active contracts (all companies) whose end date is on or before `date`.
    async fn list_active_ending_by(&self, date: NaiveDate) -> Result<Vec<Contract>, DomainError>;
    /// Number of contracts of any status referencing the property.
    async fn count_by_property(&self, property_id: &Uuid) -> Result<i64, DomainError>;
}
