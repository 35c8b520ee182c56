//! Tenant (renter) records, scoped by company

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crm_shared::Pagination;

use super::{scoped, Actor};
use crate::domain::tenant::TenantInput;
use crate::domain::Tenant;
use crate::error::DomainError;
use crate::repositories::TenantRepository;

#[derive(Clone)]
pub struct TenantService {
    repo: Arc<dyn TenantRepository>,
}

impl TenantService {
    pub fn new(repo: Arc<dyn TenantRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, actor: &Actor, page: &Pagination) -> Result<Vec<Tenant>, DomainError> {
        self.repo.list_by_company(&actor.company_id, page).await
    }

    pub async fn get(&self, actor: &Actor, id: &Uuid) -> Result<Tenant, DomainError> {
        scoped(self.repo.find_by_id(id).await?, actor, "Tenant")
    }

    pub async fn create(&self, actor: &Actor, input: TenantInput) -> Result<Tenant, DomainError> {
        let tenant = Tenant::new(actor.company_id, actor.user_id, input)?;
        self.ensure_unique_document(actor, &tenant).await?;

        let created = self.repo.create(&tenant).await?;
        info!("Tenant {} created by user {}", created.id, actor.user_id);
        Ok(created)
    }

    pub async fn update(&self, actor: &Actor, id: &Uuid, input: TenantInput) -> Result<Tenant, DomainError> {
        let mut tenant = self.get(actor, id).await?;
        tenant.apply(input)?;
        self.ensure_unique_document(actor, &tenant).await?;

        let updated = self.repo.update(&tenant).await?;
        info!("Tenant {} updated", updated.id);
        Ok(updated)
    }

    pub async fn delete(&self, actor: &Actor, id: &Uuid) -> Result<(), DomainError> {
        let tenant = self.get(actor, id).await?;
        if self.repo.count_contracts(&tenant.id).await? > 0 {
            warn!("Refusing to delete tenant {} with contracts", tenant.id);
            return Err(DomainError::Conflict("Tenant has contracts".to_string()));
        }
        self.repo.delete(&tenant.id).await?;
        info!("Tenant {} deleted", tenant.id);
        Ok(())
    }

    async fn ensure_unique_document(&self, actor: &Actor, tenant: &Tenant) -> Result<(), DomainError> {
        match self.repo.find_by_document(&actor.company_id, &tenant.document).await? {
            Some(existing) if existing.id != tenant.id => {
                warn!("Duplicate tenant document in company {}", actor.company_id);
                Err(DomainError::DocumentAlreadyExists(tenant.document.clone()))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockTenantRepository;
    use crate::services::test_support::actor;

    fn input(document: &str) -> TenantInput {
        TenantInput {
            name: "Carla Dias".to_string(),
            email: Some("carla@mail.com".to_string()),
            phone: None,
            document: document.to_string(),
            monthly_income_cents: Some(650_000),
            occupation: None,
        }
    }

    #[tokio::test]
    async fn test_update_keeps_own_document() {
        let actor = actor();
        let tenant = Tenant::new(actor.company_id, actor.user_id, input("98765432100")).unwrap();
        let id = tenant.id;
        let found = tenant.clone();

        let mut repo = MockTenantRepository::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(found.clone())));
        repo.expect_find_by_document()
            .returning(move |_, _| Ok(Some(tenant.clone())));
        repo.expect_update().times(1).returning(|t| Ok(t.clone()));

        let service = TenantService::new(Arc::new(repo));
        let updated = service.update(&actor, &id, input("987.654.321-00")).await.unwrap();
        assert_eq!(updated.document, "98765432100");
    }

    #[tokio::test]
    async fn test_update_to_taken_document_conflicts() {
        let actor = actor();
        let tenant = Tenant::new(actor.company_id, actor.user_id, input("98765432100")).unwrap();
        let other = Tenant::new(actor.company_id, actor.user_id, input("11122233344")).unwrap();
        let id = tenant.id;

        let mut repo = MockTenantRepository::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(tenant.clone())));
        repo.expect_find_by_document()
            .returning(move |_, _| Ok(Some(other.clone())));
        repo.expect_update().never();

        let service = TenantService::new(Arc::new(repo));
        let result = service.update(&actor, &id, input("11122233344")).await;
        assert!(matches!(result, Err(DomainError::DocumentAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_invalid_input_rejected() {
        let actor = actor();
        let repo = MockTenantRepository::new();
        let service = TenantService::new(Arc::new(repo));
        let result = service.create(&actor, input("1")).await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }
}
