//! Owner repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crm_shared::Pagination;
use crate::domain::Owner;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnerRepository: Send + Sync {
    async fn list_by_company(&self, company_id: &Uuid, page: &Pagination) -> Result<Vec<Owner>, DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Owner>, DomainError>;
    async fn find_by_document(&self, company_id: &Uuid, document: &str) -> Result<Option<Owner>, DomainError>;
    async fn create(&self, owner: &Owner) -> Result<Owner, DomainError>;
    async fn update(&self, owner: &Owner) -> Result<Owner, DomainError>;
    async fn delete(&self, id: &Uuid) -> Result<(), DomainError>;
    async fn count_properties(&self, owner_id: &Uuid) -> Result<i64, DomainError>;
}
