//! Property repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crm_shared::Pagination;
use crate::domain::Property;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn list_by_company(&self, company_id: &Uuid, page: &Pagination) -> Result<Vec<Property>, DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Property>, DomainError>;
    async fn create(&self, property: &Property) -> Result<Property, DomainError>;
    async fn update(&self, property: &Property) -> Result<Property, DomainError>;
    async fn delete(&self, id: &Uuid) -> Result<(), DomainError>;
    /// Available properties of one company.
    async fn list_available(&self, company_id: &Uuid) -> Result<Vec<Property>, DomainError>;
    /// Available properties of every other broker, in any company, with partnerships enabled.
    async fn list_shared_available(&self, exclude_user_id: &Uuid) -> Result<Vec<Property>, DomainError>;
    /// Available properties flagged for marketplace publication.
    async fn list_published(&self, company_id: &Uuid) -> Result<Vec<Property>, DomainError>;
}
