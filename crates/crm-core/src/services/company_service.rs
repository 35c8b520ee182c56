//! Company profile

use std::sync::Arc;

use tracing::{info, warn};

use super::Actor;
use crate::domain::{Company, CompanyInput, UserRole};
use crate::error::DomainError;
use crate::repositories::CompanyRepository;

#[derive(Clone)]
pub struct CompanyService {
    repo: Arc<dyn CompanyRepository>,
}

impl CompanyService {
    pub fn new(repo: Arc<dyn CompanyRepository>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, actor: &Actor) -> Result<Company, DomainError> {
        self.repo.find_by_id(&actor.company_id).await?
            .ok_or(DomainError::NotFound("Company"))
    }

    /// Only admins edit the company profile.
    pub async fn update(&self, actor: &Actor, input: CompanyInput) -> Result<Company, DomainError> {
        if actor.role != UserRole::Admin {
            warn!("User {} tried to edit company {} without admin role", actor.user_id, actor.company_id);
            return Err(DomainError::Forbidden("Only admins can edit the company".to_string()));
        }

        let mut company = self.get(actor).await?;
        company.apply(input)?;
        let updated = self.repo.update(&company).await?;
        info!("Company {} updated by {}", updated.id, actor.user_id);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockCompanyRepository;
    use crate::services::test_support::actor;

    fn input() -> CompanyInput {
        CompanyInput {
            name: "Sol Imóveis".to_string(),
            document: None,
        }
    }

    #[tokio::test]
    async fn test_admin_updates_company() {
        let actor = actor();
        let company = Company::new("Imobiliária Sol".into(), None).unwrap();
        let mut repo = MockCompanyRepository::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(company.clone())));
        repo.expect_update()
            .withf(|c| c.name == "Sol Imóveis" && c.modified_at.is_some())
            .times(1)
            .returning(|c| Ok(c.clone()));

        let updated = CompanyService::new(Arc::new(repo)).update(&actor, input()).await.unwrap();
        assert_eq!(updated.name, "Sol Imóveis");
    }

    #[tokio::test]
    async fn test_broker_cannot_update_company() {
        let mut actor = actor();
        actor.role = UserRole::Broker;
        let mut repo = MockCompanyRepository::new();
        repo.expect_update().never();

        let result = CompanyService::new(Arc::new(repo)).update(&actor, input()).await;
        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }
}
