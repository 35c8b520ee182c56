//! Partnership notification repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::PartnershipNotification;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PartnershipRepository: Send + Sync {
    /// Returns false when the (lead, property, from, to) pair already exists.
    async fn insert_if_absent(&self, partnership: &PartnershipNotification) -> Result<bool, DomainError>;
    async fn list_for_user(&self, user_id: &Uuid) -> Result<Vec<PartnershipNotification>, DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<PartnershipNotification>, DomainError>;
    async fn update(&self, partnership: &PartnershipNotification) -> Result<PartnershipNotification, DomainError>;
}
