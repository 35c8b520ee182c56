//! Runs lead/property matching after a lead or property changes
//!
//! Same-company matches notify the lead's broker. Matches with another
//! broker's property, in this company or any other, become partnerships when
//! both brokers share.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::notification_service::NotificationService;
use super::partnership_service::PartnershipService;
use super::settings_service::effective_settings;
use crate::domain::{Lead, NewNotification, NotificationKind, Property, Settings};
use crate::error::DomainError;
use crate::matching::{evaluate, LeadCriteria};
use crate::repositories::{LeadRepository, PropertyRepository, SettingsRepository};

/// Side effects produced by one matching pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchOutcome {
    pub notifications: usize,
    pub partnerships: usize,
}

#[derive(Clone)]
pub struct MatchService {
    property_repo: Arc<dyn PropertyRepository>,
    lead_repo: Arc<dyn LeadRepository>,
    settings_repo: Arc<dyn SettingsRepository>,
    notifications: NotificationService,
    partnerships: PartnershipService,
}

impl MatchService {
    pub fn new(
        property_repo: Arc<dyn PropertyRepository>,
        lead_repo: Arc<dyn LeadRepository>,
        settings_repo: Arc<dyn SettingsRepository>,
        notifications: NotificationService,
        partnerships: PartnershipService,
    ) -> Self {
        Self {
            property_repo,
            lead_repo,
            settings_repo,
            notifications,
            partnerships,
        }
    }

    pub async fn on_lead_changed(&self, lead: &Lead) -> Result<MatchOutcome, DomainError> {
        let mut outcome = MatchOutcome::default();
        if !lead.is_open() {
            return Ok(outcome);
        }

        let settings = self.settings_for(&lead.user_id, &lead.company_id).await?;
        let criteria = LeadCriteria::from(lead);

        if settings.lead_match_notifications {
            let properties = self.property_repo.list_available(&lead.company_id).await?;
            for property in properties.iter().filter(|p| evaluate(&criteria, p).is_match()) {
                if self.notify_match(lead, property).await {
                    outcome.notifications += 1;
                }
            }
        }

        if settings.partnerships_enabled {
            let shared = self.property_repo.list_shared_available(&lead.user_id).await?;
            for property in shared.iter().filter(|p| evaluate(&criteria, p).is_match()) {
                if self.propose(lead, property).await {
                    outcome.partnerships += 1;
                }
            }
        }

        info!(
            "Lead {} matching: {} notifications, {} partnerships",
            lead.id, outcome.notifications, outcome.partnerships
        );
        Ok(outcome)
    }

    pub async fn on_property_changed(&self, property: &Property) -> Result<MatchOutcome, DomainError> {
        let mut outcome = MatchOutcome::default();
        if !property.is_available() {
            return Ok(outcome);
        }

        // Lead owners in the same company decide individually.
        let mut wants_notifications: HashMap<Uuid, bool> = HashMap::new();
        let leads = self.lead_repo.list_open_by_company(&property.company_id).await?;
        for lead in leads.iter().filter(|l| evaluate(&LeadCriteria::from(*l), property).is_match()) {
            let enabled = match wants_notifications.get(&lead.user_id) {
                Some(enabled) => *enabled,
                None => {
                    let enabled = self
                        .settings_for(&lead.user_id, &lead.company_id)
                        .await
                        .map(|s| s.lead_match_notifications)
                        .unwrap_or(true);
                    wants_notifications.insert(lead.user_id, enabled);
                    enabled
                }
            };
            if enabled && self.notify_match(lead, property).await {
                outcome.notifications += 1;
            }
        }

        let settings = self.settings_for(&property.user_id, &property.company_id).await?;
        if settings.partnerships_enabled {
            let shared = self.lead_repo.list_shared_open(&property.user_id).await?;
            for lead in shared.iter().filter(|l| evaluate(&LeadCriteria::from(*l), property).is_match()) {
                if self.propose(lead, property).await {
                    outcome.partnerships += 1;
                }
            }
        }

        info!(
            "Property {} matching: {} notifications, {} partnerships",
            property.id, outcome.notifications, outcome.partnerships
        );
        Ok(outcome)
    }

    /// Available properties of the lead's company that match it.
    pub async fn matches_for(&self, lead: &Lead) -> Result<Vec<Property>, DomainError> {
        let criteria = LeadCriteria::from(lead);
        let properties = self.property_repo.list_available(&lead.company_id).await?;
        Ok(properties
            .into_iter()
            .filter(|p| evaluate(&criteria, p).is_match())
            .collect())
    }

    async fn settings_for(&self, user_id: &Uuid, company_id: &Uuid) -> Result<Settings, DomainError> {
        effective_settings(self.settings_repo.as_ref(), user_id, company_id).await
    }

    async fn notify_match(&self, lead: &Lead, property: &Property) -> bool {
        let notification = NewNotification::new(
            lead.company_id,
            lead.user_id,
            NotificationKind::LeadMatch,
            "New property match",
            format!("Property \"{}\" matches lead \"{}\"", property.title, lead.name),
        )
        .lead(lead.id)
        .property(property.id);

        match self.notifications.notify_once(notification).await {
            Ok(inserted) => inserted,
            Err(e) => {
                warn!("Match notification for lead {} failed: {}", lead.id, e);
                false
            }
        }
    }

    async fn propose(&self, lead: &Lead, property: &Property) -> bool {
        match self.partnerships.record(lead, property).await {
            Ok(created) => created,
            Err(e) => {
                warn!("Partnership for lead {} / property {} failed: {}", lead.id, property.id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::SettingsInput;
    use crate::domain::LeadStatus;
    use crate::repositories::{
        MockLeadRepository, MockNotificationRepository, MockPartnershipRepository,
        MockPropertyRepository, MockSettingsRepository,
    };
    use crate::services::partnership_service::tests::{foreign_property, lead_for};
    use crate::services::test_support::actor;

    struct Mocks {
        properties: MockPropertyRepository,
        leads: MockLeadRepository,
        settings: MockSettingsRepository,
        notifications: MockNotificationRepository,
        partnerships: MockPartnershipRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                properties: MockPropertyRepository::new(),
                leads: MockLeadRepository::new(),
                settings: MockSettingsRepository::new(),
                notifications: MockNotificationRepository::new(),
                partnerships: MockPartnershipRepository::new(),
            }
        }

        fn build(self) -> MatchService {
            let properties: Arc<dyn PropertyRepository> = Arc::new(self.properties);
            let leads: Arc<dyn LeadRepository> = Arc::new(self.leads);
            let settings: Arc<dyn SettingsRepository> = Arc::new(self.settings);
            let notifications = NotificationService::new(Arc::new(self.notifications));
            let partnerships = PartnershipService::new(
                Arc::new(self.partnerships),
                leads.clone(),
                properties.clone(),
                settings.clone(),
                notifications.clone(),
            );
            MatchService::new(properties, leads, settings, notifications, partnerships)
        }
    }

    fn own_property(lead: &Lead) -> Property {
        let mut property = foreign_property();
        property.company_id = lead.company_id;
        property
    }

    #[tokio::test]
    async fn test_lead_change_notifies_own_matches_and_proposes_shared() {
        let actor = actor();
        let lead = lead_for(&actor);
        let own = own_property(&lead);
        let shared = foreign_property();

        let mut mocks = Mocks::new();
        mocks.settings.expect_find_by_user().returning(|_| Ok(None));
        mocks.properties.expect_list_available().returning(move |_| Ok(vec![own.clone()]));
        mocks.properties.expect_list_shared_available().returning(move |_| Ok(vec![shared.clone()]));
        mocks.notifications.expect_insert_if_absent().returning(|_, _| Ok(true));
        mocks.partnerships.expect_insert_if_absent().times(1).returning(|_| Ok(true));

        let outcome = mocks.build().on_lead_changed(&lead).await.unwrap();
        assert_eq!(outcome, MatchOutcome { notifications: 1, partnerships: 1 });
    }

    #[tokio::test]
    async fn test_repeated_lead_change_is_idempotent() {
        let actor = actor();
        let lead = lead_for(&actor);
        let own = own_property(&lead);

        let mut mocks = Mocks::new();
        mocks.settings.expect_find_by_user().returning(|_| Ok(None));
        mocks.properties.expect_list_available().returning(move |_| Ok(vec![own.clone()]));
        mocks.properties.expect_list_shared_available().returning(|_| Ok(vec![]));
        mocks.notifications.expect_insert_if_absent().returning(|_, _| Ok(false));

        let outcome = mocks.build().on_lead_changed(&lead).await.unwrap();
        assert_eq!(outcome.notifications, 0);
    }

    #[tokio::test]
    async fn test_closed_lead_is_not_matched() {
        let actor = actor();
        let mut lead = lead_for(&actor);
        lead.status = LeadStatus::Won;

        let mut mocks = Mocks::new();
        mocks.properties.expect_list_available().never();
        let outcome = mocks.build().on_lead_changed(&lead).await.unwrap();
        assert_eq!(outcome, MatchOutcome::default());
    }

    #[tokio::test]
    async fn test_sharing_disabled_skips_partnerships() {
        let actor = actor();
        let lead = lead_for(&actor);
        let mut settings = Settings::defaults(actor.user_id, actor.company_id);
        settings
            .apply(SettingsInput {
                reminder_days_before: 3,
                partnerships_enabled: false,
                lead_match_notifications: true,
            })
            .unwrap();

        let mut mocks = Mocks::new();
        mocks.settings.expect_find_by_user().returning(move |_| Ok(Some(settings.clone())));
        mocks.properties.expect_list_available().returning(|_| Ok(vec![]));
        mocks.properties.expect_list_shared_available().never();

        let outcome = mocks.build().on_lead_changed(&lead).await.unwrap();
        assert_eq!(outcome.partnerships, 0);
    }

    #[tokio::test]
    async fn test_property_change_notifies_matching_lead_owner() {
        let actor = actor();
        let lead = lead_for(&actor);
        let mut other = lead_for(&actor);
        other.min_bedrooms = Some(4);
        let property = own_property(&lead);
        let lead_owner = lead.user_id;

        let mut mocks = Mocks::new();
        mocks.leads.expect_list_open_by_company()
            .returning(move |_| Ok(vec![lead.clone(), other.clone()]));
        mocks.leads.expect_list_shared_open().returning(|_| Ok(vec![]));
        mocks.settings.expect_find_by_user().returning(|_| Ok(None));
        mocks.notifications.expect_insert_if_absent()
            .withf(move |n, _| n.user_id == lead_owner && n.kind == NotificationKind::LeadMatch)
            .times(1)
            .returning(|_, _| Ok(true));

        let outcome = mocks.build().on_property_changed(&property).await.unwrap();
        assert_eq!(outcome.notifications, 1);
    }

    #[tokio::test]
    async fn test_colleague_property_becomes_partnership() {
        let actor = actor();
        let lead = lead_for(&actor);
        let property = own_property(&lead);
        let property_broker = property.user_id;
        assert_ne!(property_broker, lead.user_id);

        let mut mocks = Mocks::new();
        let own_lead = lead.clone();
        mocks.leads.expect_list_open_by_company().returning(move |_| Ok(vec![own_lead.clone()]));
        let shared_lead = lead.clone();
        mocks.leads.expect_list_shared_open()
            .withf(move |exclude| *exclude == property_broker)
            .returning(move |_| Ok(vec![shared_lead.clone()]));
        mocks.settings.expect_find_by_user().returning(|_| Ok(None));
        mocks.notifications.expect_insert_if_absent().returning(|_, _| Ok(true));
        mocks.partnerships.expect_insert_if_absent()
            .withf(move |p| p.to_user_id == property_broker)
            .times(1)
            .returning(|_| Ok(true));

        let outcome = mocks.build().on_property_changed(&property).await.unwrap();
        assert_eq!(outcome, MatchOutcome { notifications: 1, partnerships: 1 });
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_abort() {
        let actor = actor();
        let lead = lead_for(&actor);
        let own = own_property(&lead);

        let mut mocks = Mocks::new();
        mocks.settings.expect_find_by_user().returning(|_| Ok(None));
        mocks.properties.expect_list_available().returning(move |_| Ok(vec![own.clone()]));
        mocks.properties.expect_list_shared_available().returning(|_| Ok(vec![]));
        mocks.notifications.expect_insert_if_absent()
            .returning(|_, _| Err(DomainError::DatabaseError("down".to_string())));

        let outcome = mocks.build().on_lead_changed(&lead).await.unwrap();
        assert_eq!(outcome.notifications, 0);
    }
}
