//! Port for the text-generation provider used by delinquency analysis and
//! contract drafting.

use async_trait::async_trait;

use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Single-turn completion. Failures map to [`DomainError::AiError`].
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, DomainError>;
}
