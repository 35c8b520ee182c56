//! Property listings, scoped by company

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crm_shared::Pagination;

use super::match_service::MatchService;
use super::{scoped, Actor};
use crate::domain::property::PropertyInput;
use crate::domain::Property;
use crate::error::DomainError;
use crate::repositories::{ContractRepository, OwnerRepository, PropertyRepository};

#[derive(Clone)]
pub struct PropertyService {
    repo: Arc<dyn PropertyRepository>,
    owner_repo: Arc<dyn OwnerRepository>,
    contract_repo: Arc<dyn ContractRepository>,
    matcher: MatchService,
}

impl PropertyService {
    pub fn new(
        repo: Arc<dyn PropertyRepository>,
        owner_repo: Arc<dyn OwnerRepository>,
        contract_repo: Arc<dyn ContractRepository>,
        matcher: MatchService,
    ) -> Self {
        Self {
            repo,
            owner_repo,
            contract_repo,
            matcher,
        }
    }

    pub async fn list(&self, actor: &Actor, page: &Pagination) -> Result<Vec<Property>, DomainError> {
        self.repo.list_by_company(&actor.company_id, page).await
    }

    pub async fn get(&self, actor: &Actor, id: &Uuid) -> Result<Property, DomainError> {
        scoped(self.repo.find_by_id(id).await?, actor, "Property")
    }

    pub async fn create(&self, actor: &Actor, input: PropertyInput) -> Result<Property, DomainError> {
        self.ensure_owner(actor, &input.owner_id).await?;
        let property = Property::new(actor.company_id, actor.user_id, input)?;

        let created = self.repo.create(&property).await?;
        info!("Property {} created by user {}", created.id, actor.user_id);
        self.run_matching(&created).await;
        Ok(created)
    }

    pub async fn update(&self, actor: &Actor, id: &Uuid, input: PropertyInput) -> Result<Property, DomainError> {
        let mut property = self.get(actor, id).await?;
        if input.owner_id != property.owner_id {
            self.ensure_owner(actor, &input.owner_id).await?;
        }
        property.apply(input)?;

        let updated = self.repo.update(&property).await?;
        info!("Property {} updated", updated.id);
        self.run_matching(&updated).await;
        Ok(updated)
    }

    pub async fn delete(&self, actor: &Actor, id: &Uuid) -> Result<(), DomainError> {
        let property = self.get(actor, id).await?;
        let contracts = self.contract_repo.count_by_property(&property.id).await?;
        if contracts > 0 {
            warn!("Refusing to delete property {} referenced by {} contracts", property.id, contracts);
            return Err(DomainError::Conflict("Property has contracts".to_string()));
        }
        self.repo.delete(&property.id).await?;
        info!("Property {} deleted", property.id);
        Ok(())
    }

    async fn ensure_owner(&self, actor: &Actor, owner_id: &Uuid) -> Result<(), DomainError> {
        let owner = self.owner_repo.find_by_id(owner_id).await?;
        scoped(owner, actor, "Owner").map(|_| ())
    }

    async fn run_matching(&self, property: &Property) {
        if let Err(e) = self.matcher.on_property_changed(property).await {
            warn!("Matching after property {} change failed: {}", property.id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::owner::OwnerInput;
    use crate::domain::property::tests::sample_input;
    use crate::domain::Owner;
    use crate::repositories::*;
    use crate::services::notification_service::NotificationService;
    use crate::services::partnership_service::PartnershipService;
    use crate::services::test_support::actor;

    fn matcher(leads: MockLeadRepository, settings: MockSettingsRepository) -> MatchService {
        let properties: Arc<dyn PropertyRepository> = Arc::new(MockPropertyRepository::new());
        let leads: Arc<dyn LeadRepository> = Arc::new(leads);
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

    fn owner_of(actor: &Actor) -> Owner {
        Owner::new(
            actor.company_id,
            actor.user_id,
            OwnerInput {
                name: "João Lima".to_string(),
                email: None,
                phone: None,
                document: "12345678909".to_string(),
                address: None,
                pix_key: None,
                notes: None,
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_survives_matching_failure() {
        let actor = actor();
        let owner = owner_of(&actor);
        let mut input = sample_input();
        input.owner_id = owner.id;

        let mut owners = MockOwnerRepository::new();
        owners.expect_find_by_id().returning(move |_| Ok(Some(owner.clone())));
        let mut repo = MockPropertyRepository::new();
        repo.expect_create().times(1).returning(|p| Ok(p.clone()));
        let mut leads = MockLeadRepository::new();
        leads.expect_list_open_by_company()
            .returning(|_| Err(DomainError::DatabaseError("timeout".to_string())));

        let service = PropertyService::new(
            Arc::new(repo),
            Arc::new(owners),
            Arc::new(MockContractRepository::new()),
            matcher(leads, MockSettingsRepository::new()),
        );
        let created = service.create(&actor, input).await.unwrap();
        assert_eq!(created.company_id, actor.company_id);
    }

    #[tokio::test]
    async fn test_create_with_foreign_owner_is_not_found() {
        let actor = actor();
        let foreign = owner_of(&crate::services::test_support::actor());
        let mut input = sample_input();
        input.owner_id = foreign.id;

        let mut owners = MockOwnerRepository::new();
        owners.expect_find_by_id().returning(move |_| Ok(Some(foreign.clone())));
        let mut repo = MockPropertyRepository::new();
        repo.expect_create().never();

        let service = PropertyService::new(
            Arc::new(repo),
            Arc::new(owners),
            Arc::new(MockContractRepository::new()),
            matcher(MockLeadRepository::new(), MockSettingsRepository::new()),
        );
        assert!(matches!(
            service.create(&actor, input).await,
            Err(DomainError::NotFound("Owner"))
        ));
    }

    #[tokio::test]
    async fn test_delete_with_contract_conflicts() {
        let actor = actor();
        let property = Property::new(actor.company_id, actor.user_id, sample_input()).unwrap();
        let id = property.id;

        let mut repo = MockPropertyRepository::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(property.clone())));
        repo.expect_delete().never();
        let mut contracts = MockContractRepository::new();
        contracts.expect_count_by_property().returning(|_| Ok(1));

        let service = PropertyService::new(
            Arc::new(repo),
            Arc::new(MockOwnerRepository::new()),
            Arc::new(contracts),
            matcher(MockLeadRepository::new(), MockSettingsRepository::new()),
        );
        assert!(matches!(service.delete(&actor, &id).await, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_with_only_ended_contracts_still_conflicts() {
        let actor = actor();
        let mut property = Property::new(actor.company_id, actor.user_id, sample_input()).unwrap();
        property.status = crate::domain::PropertyStatus::Available;
        let id = property.id;

        let mut repo = MockPropertyRepository::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(property.clone())));
        repo.expect_delete().never();
        let mut contracts = MockContractRepository::new();
        contracts.expect_count_by_property()
            .withf(move |property_id| *property_id == id)
            .returning(|_| Ok(2));

        let service = PropertyService::new(
            Arc::new(repo),
            Arc::new(MockOwnerRepository::new()),
            Arc::new(contracts),
            matcher(MockLeadRepository::new(), MockSettingsRepository::new()),
        );
        match service.delete(&actor, &id).await {
            Err(DomainError::Conflict(msg)) => assert_eq!(msg, "Property has contracts"),
            other => panic!("expected conflict, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_delete_without_contracts() {
        let actor = actor();
        let property = Property::new(actor.company_id, actor.user_id, sample_input()).unwrap();
        let id = property.id;

        let mut repo = MockPropertyRepository::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(property.clone())));
        repo.expect_delete().times(1).returning(|_| Ok(()));
        let mut contracts = MockContractRepository::new();
        contracts.expect_count_by_property().returning(|_| Ok(0));

        let service = PropertyService::new(
            Arc::new(repo),
            Arc::new(MockOwnerRepository::new()),
            Arc::new(contracts),
            matcher(MockLeadRepository::new(), MockSettingsRepository::new()),
        );
        service.delete(&actor, &id).await.unwrap();
    }
}
