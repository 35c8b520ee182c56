//! Lead repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crm_shared::Pagination;
use crate::domain::Lead;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn list_by_company(&self, company_id: &Uuid, page: &Pagination) -> Result<Vec<Lead>, DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Lead>, DomainError>;
    async fn create(&self, lead: &Lead) -> Result<Lead, DomainError>;
    async fn update(&self, lead: &Lead) -> Result<Lead, DomainError>;
    async fn delete(&self, id: &Uuid) -> Result<(), DomainError>;
    async fn list_open_by_company(&self, company_id: &Uuid) -> Result<Vec<Lead>, DomainError>;
    async fn list_open_by_user(&self, user_id: &Uuid) -> Result<Vec<Lead>, DomainError>;
    /// Open leads of every other broker, in any company, with partnerships enabled.
    async fn list_shared_open(&self, exclude_user_id: &Uuid) -> Result<Vec<Lead>, DomainError>;
}
