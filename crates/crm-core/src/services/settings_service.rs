//! Per-user settings

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::Actor;
use crate::domain::settings::SettingsInput;
use crate::domain::Settings;
use crate::error::DomainError;
use crate::repositories::SettingsRepository;

#[derive(Clone)]
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, actor: &Actor) -> Result<Settings, DomainError> {
        effective_settings(self.repo.as_ref(), &actor.user_id, &actor.company_id).await
    }

    pub async fn update(&self, actor: &Actor, input: SettingsInput) -> Result<Settings, DomainError> {
        let mut settings = self.get(actor).await?;
        settings.apply(input)?;
        let saved = self.repo.upsert(&settings).await?;
        info!("Settings updated for user {}", actor.user_id);
        Ok(saved)
    }
}

/// Stored settings, or the defaults when the user never saved any.
pub(crate) async fn effective_settings(
    repo: &dyn SettingsRepository,
    user_id: &Uuid,
    company_id: &Uuid,
) -> Result<Settings, DomainError> {
    Ok(repo
        .find_by_user(user_id)
        .await?
        .unwrap_or_else(|| Settings::defaults(*user_id, *company_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockSettingsRepository;
    use crate::services::test_support::actor;
    use crm_shared::constants::DEFAULT_REMINDER_DAYS_BEFORE;

    #[tokio::test]
    async fn test_get_falls_back_to_defaults() {
        let mut repo = MockSettingsRepository::new();
        repo.expect_find_by_user().returning(|_| Ok(None));

        let service = SettingsService::new(Arc::new(repo));
        let actor = actor();
        let settings = service.get(&actor).await.unwrap();
        assert_eq!(settings.user_id, actor.user_id);
        assert_eq!(settings.reminder_days_before, DEFAULT_REMINDER_DAYS_BEFORE);
    }

    #[tokio::test]
    async fn test_update_out_of_range_is_rejected() {
        let mut repo = MockSettingsRepository::new();
        repo.expect_find_by_user().returning(|_| Ok(None));
        repo.expect_upsert().never();

        let service = SettingsService::new(Arc::new(repo));
        let input = SettingsInput {
            reminder_days_before: 31,
            partnerships_enabled: true,
            lead_match_notifications: true,
        };
        assert!(matches!(
            service.update(&actor(), input).await,
            Err(DomainError::ValidationError(_))
        ));
    }
}
