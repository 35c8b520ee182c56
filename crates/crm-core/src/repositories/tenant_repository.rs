//! Tenant repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crm_shared::Pagination;
use crate::domain::Tenant;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn list_by_company(&self, company_id: &Uuid, page: &Pagination) -> Result<Vec<Tenant>, DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Tenant>, DomainError>;
    async fn find_by_document(&self, company_id: &Uuid, document: &str) -> Result<Option<Tenant>, DomainError>;
    async fn create(&self, tenant: &Tenant) -> Result<Tenant, DomainError>;
    async fn update(&self, tenant: &Tenant) -> Result<Tenant, DomainError>;
    async fn delete(&self, id: &Uuid) -> Result<(), DomainError>;
    async fn count_contracts(&self, tenant_id: &Uuid) -> Result<i64, DomainError>;
}
