//! Owner (landlord) records, scoped by company

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crm_shared::Pagination;

use super::{scoped, Actor};
use crate::domain::owner::OwnerInput;
use crate::domain::Owner;
use crate::error::DomainError;
use crate::repositories::OwnerRepository;

#[derive(Clone)]
pub struct OwnerService {
    repo: Arc<dyn OwnerRepository>,
}

impl OwnerService {
    pub fn new(repo: Arc<dyn OwnerRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, actor: &Actor, page: &Pagination) -> Result<Vec<Owner>, DomainError> {
        self.repo.list_by_company(&actor.company_id, page).await
    }

    pub async fn get(&self, actor: &Actor, id: &Uuid) -> Result<Owner, DomainError> {
        scoped(self.repo.find_by_id(id).await?, actor, "Owner")
    }

    pub async fn create(&self, actor: &Actor, input: OwnerInput) -> Result<Owner, DomainError> {
        let owner = Owner::new(actor.company_id, actor.user_id, input)?;
        self.ensure_unique_document(actor, &owner).await?;

        let created = self.repo.create(&owner).await?;
        info!("Owner {} created by user {}", created.id, actor.user_id);
        Ok(created)
    }

    pub async fn update(&self, actor: &Actor, id: &Uuid, input: OwnerInput) -> Result<Owner, DomainError> {
        let mut owner = self.get(actor, id).await?;
        owner.apply(input)?;
        self.ensure_unique_document(actor, &owner).await?;

        let updated = self.repo.update(&owner).await?;
        info!("Owner {} updated", updated.id);
        Ok(updated)
    }

    pub async fn delete(&self, actor: &Actor, id: &Uuid) -> Result<(), DomainError> {
        let owner = self.get(actor, id).await?;
        if self.repo.count_properties(&owner.id).await? > 0 {
            warn!("Refusing to delete owner {} with properties", owner.id);
            return Err(DomainError::Conflict("Owner still has properties".to_string()));
        }
        self.repo.delete(&owner.id).await?;
        info!("Owner {} deleted", owner.id);
        Ok(())
    }

    async fn ensure_unique_document(&self, actor: &Actor, owner: &Owner) -> Result<(), DomainError> {
        match self.repo.find_by_document(&actor.company_id, &owner.document).await? {
            Some(existing) if existing.id != owner.id => {
                warn!("Duplicate owner document in company {}", actor.company_id);
                Err(DomainError::DocumentAlreadyExists(owner.document.clone()))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockOwnerRepository;
    use crate::services::test_support::actor;

    fn input() -> OwnerInput {
        OwnerInput {
            name: "João Lima".to_string(),
            email: None,
            phone: None,
            document: "123.456.789-09".to_string(),
            address: None,
            pix_key: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_checks_normalized_document() {
        let actor = actor();
        let company_id = actor.company_id;
        let mut repo = MockOwnerRepository::new();
        repo.expect_find_by_document()
            .withf(move |company, document| *company == company_id && document == "12345678909")
            .returning(|_, _| Ok(None));
        repo.expect_create().times(1).returning(|o| Ok(o.clone()));

        let service = OwnerService::new(Arc::new(repo));
        let owner = service.create(&actor, input()).await.unwrap();
        assert_eq!(owner.company_id, actor.company_id);
    }

    #[tokio::test]
    async fn test_duplicate_document_rejected() {
        let actor = actor();
        let existing = Owner::new(actor.company_id, actor.user_id, input()).unwrap();
        let mut repo = MockOwnerRepository::new();
        repo.expect_find_by_document()
            .returning(move |_, _| Ok(Some(existing.clone())));
        repo.expect_create().never();

        let service = OwnerService::new(Arc::new(repo));
        let result = service.create(&actor, input()).await;
        assert!(matches!(result, Err(DomainError::DocumentAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_other_company_owner_is_not_found() {
        let actor = actor();
        let foreign = Owner::new(Uuid::new_v4(), Uuid::new_v4(), input()).unwrap();
        let id = foreign.id;
        let mut repo = MockOwnerRepository::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(foreign.clone())));

        let service = OwnerService::new(Arc::new(repo));
        assert!(matches!(service.get(&actor, &id).await, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_with_properties_conflicts() {
        let actor = actor();
        let owner = Owner::new(actor.company_id, actor.user_id, input()).unwrap();
        let id = owner.id;
        let mut repo = MockOwnerRepository::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(owner.clone())));
        repo.expect_count_properties().returning(|_| Ok(2));
        repo.expect_delete().never();

        let service = OwnerService::new(Arc::new(repo));
        assert!(matches!(service.delete(&actor, &id).await, Err(DomainError::Conflict(_))));
    }
}
