//! Settings repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::Settings;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn find_by_user(&self, user_id: &Uuid) -> Result<Option<Settings>, DomainError>;
    async fn upsert(&self, settings: &Settings) -> Result<Settings, DomainError>;
}
