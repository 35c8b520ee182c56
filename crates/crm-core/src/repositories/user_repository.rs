//! User repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{Company, Settings, User};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    /// Creates the company, its first user and their settings in one transaction.
    async fn register(&self, company: &Company, user: &User, settings: &Settings) -> Result<User, DomainError>;
    async fn update(&self, user: &User) -> Result<User, DomainError>;
}
