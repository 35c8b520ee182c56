// ============================================================================
// CRM Core - Contract Service
// File: crates/crm-core/src/services/contract_service.rs
// ============================================================================
//! Lease contracts: creation with payment schedule, term changes,
//! termination and document generation

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crm_shared::Pagination;

use super::contract_document_service::ContractDocumentService;
use super::{scoped, Actor};
use crate::domain::contract::{ContractInput, ContractTermsInput};
use crate::domain::{Contract, PropertyStatus};
use crate::error::DomainError;
use crate::repositories::{ContractRepository, OwnerRepository, PropertyRepository, TenantRepository};

#[derive(Clone)]
pub struct ContractService {
    repo: Arc<dyn ContractRepository>,
    property_repo: Arc<dyn PropertyRepository>,
    tenant_repo: Arc<dyn TenantRepository>,
    owner_repo: Arc<dyn OwnerRepository>,
    documents: ContractDocumentService,
}

impl ContractService {
    pub fn new(
        repo: Arc<dyn ContractRepository>,
        property_repo: Arc<dyn PropertyRepository>,
        tenant_repo: Arc<dyn TenantRepository>,
        owner_repo: Arc<dyn OwnerRepository>,
        documents: ContractDocumentService,
    ) -> Self {
        Self {
            repo,
            property_repo,
            tenant_repo,
            owner_repo,
            documents,
        }
    }

    pub async fn list(&self, actor: &Actor, page: &Pagination) -> Result<Vec<Contract>, DomainError> {
        self.repo.list_by_company(&actor.company_id, page).await
    }

    pub async fn get(&self, actor: &Actor, id: &Uuid) -> Result<Contract, DomainError> {
        scoped(self.repo.find_by_id(id).await?, actor, "Contract")
    }

    pub async fn create(&self, actor: &Actor, input: ContractInput) -> Result<Contract, DomainError> {
        let property = scoped(self.property_repo.find_by_id(&input.property_id).await?, actor, "Property")?;
        scoped(self.tenant_repo.find_by_id(&input.tenant_id).await?, actor, "Tenant")?;

        if !property.is_available() {
            warn!("Contract rejected: property {} is {}", property.id, property.status.as_str());
            return Err(DomainError::Conflict(format!(
                "Property is {}",
                property.status.as_str()
            )));
        }

        let contract = Contract::new(actor.company_id, actor.user_id, input)?;
        let schedule = contract.payment_schedule();
        if schedule.is_empty() {
            return Err(DomainError::ValidationError(
                "Contract period contains no due date".to_string(),
            ));
        }

        let created = self.repo.create_with_schedule(&contract, &schedule).await?;
        info!(
            "Contract {} created for property {} with {} payments",
            created.id,
            created.property_id,
            schedule.len()
        );
        Ok(created)
    }

    pub async fn update(&self, actor: &Actor, id: &Uuid, input: ContractTermsInput) -> Result<Contract, DomainError> {
        let mut contract = self.get(actor, id).await?;
        if !contract.is_active() {
            return Err(DomainError::Conflict(format!(
                "Contract is {}",
                contract.status.as_str()
            )));
        }
        contract.apply_terms(input)?;

        let updated = self.repo.update(&contract).await?;
        info!("Contract {} terms updated", updated.id);
        Ok(updated)
    }

    /// Ends an active contract, cancels the open payments due after `today`
    /// and puts the property back on the market, atomically.
    pub async fn terminate(&self, actor: &Actor, id: &Uuid, today: NaiveDate) -> Result<Contract, DomainError> {
        let mut contract = self.get(actor, id).await?;
        if !contract.is_active() {
            return Err(DomainError::Conflict(format!(
                "Contract is {}",
                contract.status.as_str()
            )));
        }
        contract.terminate();
        let (updated, cancelled) = self.repo.terminate(&contract, today).await?;

        info!("Contract {} terminated, {} payments cancelled", updated.id, cancelled);
        Ok(updated)
    }

    pub async fn generate_document(&self, actor: &Actor, id: &Uuid) -> Result<Contract, DomainError> {
        let mut contract = self.get(actor, id).await?;
        let property = scoped(self.property_repo.find_by_id(&contract.property_id).await?, actor, "Property")?;
        let tenant = scoped(self.tenant_repo.find_by_id(&contract.tenant_id).await?, actor, "Tenant")?;
        let owner = scoped(self.owner_repo.find_by_id(&property.owner_id).await?, actor, "Owner")?;

        let text = self.documents.generate(&contract, &property, &owner, &tenant).await?;
        contract.document_text = Some(text);
        contract.modified_at = Some(chrono::Utc::now());

        let updated = self.repo.update(&contract).await?;
        info!("Contract {} document generated", updated.id);
        Ok(updated)
    }
}

/// Rented properties become available again; other statuses are left alone.
pub(crate) async fn release_property(repo: &dyn PropertyRepository, property_id: &Uuid) {
    match repo.find_by_id(property_id).await {
        Ok(Some(mut property)) if property.status == PropertyStatus::Rented => {
            property.set_status(PropertyStatus::Available);
            if let Err(e) = repo.update(&property).await {
                warn!("Failed to release property {}: {}", property_id, e);
            }
        }
        Ok(_) => {}
        Err(e) => warn!("Failed to load property {}: {}", property_id, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contract::tests::sample_contract;
    use crate::domain::property::tests::sample_input;
    use crate::domain::tenant::TenantInput;
    use crate::domain::{ContractStatus, Property, Tenant};
    use crate::repositories::*;
    use crate::services::test_support::actor;

    struct Mocks {
        contracts: MockContractRepository,
        properties: MockPropertyRepository,
        tenants: MockTenantRepository,
        owners: MockOwnerRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                contracts: MockContractRepository::new(),
                properties: MockPropertyRepository::new(),
                tenants: MockTenantRepository::new(),
                owners: MockOwnerRepository::new(),
            }
        }

        fn build(self) -> ContractService {
            ContractService::new(
                Arc::new(self.contracts),
                Arc::new(self.properties),
                Arc::new(self.tenants),
                Arc::new(self.owners),
                ContractDocumentService::new(None).unwrap(),
            )
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tenant_of(actor: &Actor) -> Tenant {
        Tenant::new(
            actor.company_id,
            actor.user_id,
            TenantInput {
                name: "Carla Dias".to_string(),
                email: None,
                phone: None,
                document: "98765432100".to_string(),
                monthly_income_cents: None,
                occupation: None,
            },
        )
        .unwrap()
    }

    fn input(property: &Property, tenant: &Tenant) -> ContractInput {
        ContractInput {
            property_id: property.id,
            tenant_id: tenant.id,
            start_date: date(2025, 1, 1),
            end_date: date(2025, 12, 31),
            rent_cents: 180_000,
            deposit_cents: Some(360_000),
            due_day: 10,
            admin_fee_percent: None,
            late_fee_percent: None,
            daily_interest_percent: None,
        }
    }

    #[tokio::test]
    async fn test_create_persists_schedule() {
        let actor = actor();
        let property = Property::new(actor.company_id, actor.user_id, sample_input()).unwrap();
        let tenant = tenant_of(&actor);
        let input = input(&property, &tenant);

        let mut mocks = Mocks::new();
        mocks.properties.expect_find_by_id().returning(move |_| Ok(Some(property.clone())));
        mocks.tenants.expect_find_by_id().returning(move |_| Ok(Some(tenant.clone())));
        mocks.contracts.expect_create_with_schedule()
            .withf(|contract, payments| {
                payments.len() == 12
                    && payments.iter().all(|p| p.contract_id == contract.id && p.amount_cents == 180_000)
            })
            .times(1)
            .returning(|c, _| Ok(c.clone()));

        let contract = mocks.build().create(&actor, input).await.unwrap();
        assert_eq!(contract.status, ContractStatus::Active);
    }

    #[tokio::test]
    async fn test_create_on_rented_property_conflicts() {
        let actor = actor();
        let mut property = Property::new(actor.company_id, actor.user_id, sample_input()).unwrap();
        property.status = PropertyStatus::Rented;
        let tenant = tenant_of(&actor);
        let input = input(&property, &tenant);

        let mut mocks = Mocks::new();
        mocks.properties.expect_find_by_id().returning(move |_| Ok(Some(property.clone())));
        mocks.tenants.expect_find_by_id().returning(move |_| Ok(Some(tenant.clone())));
        mocks.contracts.expect_create_with_schedule().never();

        assert!(matches!(
            mocks.build().create(&actor, input).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_terminate_cancels_payments_in_one_step() {
        let actor = actor();
        let mut contract = sample_contract(date(2025, 1, 1), date(2025, 12, 31), 5);
        contract.company_id = actor.company_id;
        let id = contract.id;

        let mut mocks = Mocks::new();
        mocks.contracts.expect_find_by_id().returning(move |_| Ok(Some(contract.clone())));
        mocks.contracts.expect_terminate()
            .withf(move |c, day| c.id == id && c.status == ContractStatus::Terminated && *day == date(2025, 6, 15))
            .times(1)
            .returning(|c, _| Ok((c.clone(), 7)));
        mocks.contracts.expect_update().never();
        mocks.properties.expect_update().never();

        let terminated = mocks.build().terminate(&actor, &id, date(2025, 6, 15)).await.unwrap();
        assert_eq!(terminated.status, ContractStatus::Terminated);
    }

    #[tokio::test]
    async fn test_terminate_failure_leaves_nothing_half_done() {
        let actor = actor();
        let mut contract = sample_contract(date(2025, 1, 1), date(2025, 12, 31), 5);
        contract.company_id = actor.company_id;
        let id = contract.id;

        let mut mocks = Mocks::new();
        mocks.contracts.expect_find_by_id().returning(move |_| Ok(Some(contract.clone())));
        mocks.contracts.expect_terminate()
            .times(1)
            .returning(|_, _| Err(DomainError::DatabaseError("cancelling open payments".to_string())));
        mocks.contracts.expect_update().never();
        mocks.properties.expect_find_by_id().never();
        mocks.properties.expect_update().never();

        assert!(matches!(
            mocks.build().terminate(&actor, &id, date(2025, 6, 15)).await,
            Err(DomainError::DatabaseError(_))
        ));
    }

    #[tokio::test]
    async fn test_terminate_twice_conflicts() {
        let actor = actor();
        let mut contract = sample_contract(date(2025, 1, 1), date(2025, 12, 31), 5);
        contract.company_id = actor.company_id;
        contract.terminate();
        let id = contract.id;

        let mut mocks = Mocks::new();
        mocks.contracts.expect_find_by_id().returning(move |_| Ok(Some(contract.clone())));
        mocks.contracts.expect_terminate().never();

        assert!(matches!(
            mocks.build().terminate(&actor, &id, date(2025, 6, 15)).await,
            Err(DomainError::Conflict(_))
        ));
    }
}
