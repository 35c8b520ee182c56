//! Leads (prospective tenants and buyers), scoped by company

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crm_shared::Pagination;

use super::match_service::MatchService;
use super::{scoped, Actor};
use crate::domain::lead::LeadInput;
use crate::domain::{Lead, Property};
use crate::error::DomainError;
use crate::repositories::LeadRepository;

#[derive(Clone)]
pub struct LeadService {
    repo: Arc<dyn LeadRepository>,
    matcher: MatchService,
}

impl LeadService {
    pub fn new(repo: Arc<dyn LeadRepository>, matcher: MatchService) -> Self {
        Self { repo, matcher }
    }

    pub async fn list(&self, actor: &Actor, page: &Pagination) -> Result<Vec<Lead>, DomainError> {
        self.repo.list_by_company(&actor.company_id, page).await
    }

    pub async fn get(&self, actor: &Actor, id: &Uuid) -> Result<Lead, DomainError> {
        scoped(self.repo.find_by_id(id).await?, actor, "Lead")
    }

    pub async fn create(&self, actor: &Actor, input: LeadInput) -> Result<Lead, DomainError> {
        let lead = Lead::new(actor.company_id, actor.user_id, input)?;
        let created = self.repo.create(&lead).await?;
        info!("Lead {} created by user {}", created.id, actor.user_id);
        self.run_matching(&created).await;
        Ok(created)
    }

    /// Creates a lead on behalf of a broker, outside of an HTTP session.
    pub async fn create_for(&self, company_id: Uuid, user_id: Uuid, input: LeadInput) -> Result<Lead, DomainError> {
        let lead = Lead::new(company_id, user_id, input)?;
        let created = self.repo.create(&lead).await?;
        info!("Lead {} created for user {} ({})", created.id, user_id, created.source.as_str());
        self.run_matching(&created).await;
        Ok(created)
    }

    pub async fn update(&self, actor: &Actor, id: &Uuid, input: LeadInput) -> Result<Lead, DomainError> {
        let mut lead = self.get(actor, id).await?;
        lead.apply(input)?;
        let updated = self.repo.update(&lead).await?;
        info!("Lead {} updated", updated.id);
        self.run_matching(&updated).await;
        Ok(updated)
    }

    pub async fn delete(&self, actor: &Actor, id: &Uuid) -> Result<(), DomainError> {
        let lead = self.get(actor, id).await?;
        self.repo.delete(&lead.id).await?;
        info!("Lead {} deleted", lead.id);
        Ok(())
    }

    pub async fn matches(&self, actor: &Actor, id: &Uuid) -> Result<Vec<Property>, DomainError> {
        let lead = self.get(actor, id).await?;
        self.matcher.matches_for(&lead).await
    }

    async fn run_matching(&self, lead: &Lead) {
        if let Err(e) = self.matcher.on_lead_changed(lead).await {
            warn!("Matching after lead {} change failed: {}", lead.id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lead::tests::sample_input;
    use crate::domain::property::tests::sample_input as property_input;
    use crate::repositories::*;
    use crate::services::notification_service::NotificationService;
    use crate::services::partnership_service::PartnershipService;
    use crate::services::test_support::actor;

    fn matcher(properties: MockPropertyRepository, settings: MockSettingsRepository) -> MatchService {
        let properties: Arc<dyn PropertyRepository> = Arc::new(properties);
        let leads: Arc<dyn LeadRepository> = Arc::new(MockLeadRepository::new());
        let settings: Arc<dyn SettingsRepository> = Arc::new(settings);
        let notifications = NotificationService::new(Arc::new(MockNotificationRepository::new()));
        let partnerships = PartnershipService::new(
            Arc::new(MockPartnershipRepository::new()),
            leads.clone(),
            properties.clone(),
            settings.clone(),
            notifications.clone(),
        );
        MatchService::new(properties, leads, settings, notifications, partnerships)
    }

    #[tokio::test]
    async fn test_invalid_range_is_validation_error() {
        let mut repo = MockLeadRepository::new();
        repo.expect_create().never();
        let service = LeadService::new(
            Arc::new(repo),
            matcher(MockPropertyRepository::new(), MockSettingsRepository::new()),
        );

        let mut input = sample_input();
        input.min_bedrooms = Some(4);
        input.max_bedrooms = Some(2);
        assert!(matches!(
            service.create(&actor(), input).await,
            Err(DomainError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_matches_lists_company_properties_that_fit() {
        let actor = actor();
        let lead = Lead::new(actor.company_id, actor.user_id, sample_input()).unwrap();
        let id = lead.id;
        let fits = Property::new(actor.company_id, actor.user_id, property_input()).unwrap();
        let mut too_expensive = fits.clone();
        too_expensive.id = Uuid::new_v4();
        too_expensive.rent_price_cents = Some(250_000);
        let expected = fits.id;

        let mut repo = MockLeadRepository::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(lead.clone())));
        let mut properties = MockPropertyRepository::new();
        properties.expect_list_available()
            .returning(move |_| Ok(vec![fits.clone(), too_expensive.clone()]));

        let service = LeadService::new(Arc::new(repo), matcher(properties, MockSettingsRepository::new()));
        let matches = service.matches(&actor, &id).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, expected);
    }
}
