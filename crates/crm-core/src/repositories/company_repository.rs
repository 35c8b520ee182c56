//! Company repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::Company;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Company>, DomainError>;
    async fn update(&self, company: &Company) -> Result<Company, DomainError>;
}
