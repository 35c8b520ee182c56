//! Domain services (business logic)

pub mod ai;
pub mod auth_service;
pub mod company_service;
pub mod owner_service;
pub mod tenant_service;
pub mod property_service;
pub mod lead_service;
pub mod notification_service;
pub mod match_service;
pub mod partnership_service;
pub mod contract_service;
pub mod contract_document_service;
pub mod payment_service;
pub mod reminder_service;
pub mod delinquency_service;
pub mod report_service;
pub mod settings_service;
pub mod marketplace_service;

pub use ai::AiProvider;
pub use auth_service::{AuthResult, AuthService, RegisterInput};
pub use company_service::CompanyService;
pub use owner_service::OwnerService;
pub use tenant_service::TenantService;
pub use property_service::PropertyService;
pub use lead_service::LeadService;
pub use notification_service::NotificationService;
pub use match_service::{MatchOutcome, MatchService};
pub use partnership_service::PartnershipService;
pub use contract_service::ContractService;
pub use contract_document_service::ContractDocumentService;
pub use payment_service::{PayInput, PaymentService, PaymentUpdateInput};
pub use reminder_service::{ReminderService, ReminderSummary};
pub use delinquency_service::{DelinquencyAssessment, DelinquencyService, RiskLevel};
pub use report_service::ReportService;
pub use settings_service::SettingsService;
pub use marketplace_service::{MarketplaceService, OlxLeadPayload, OlxListing};

use uuid::Uuid;

use crate::domain::{Contract, Lead, Owner, Payment, Property, Tenant, UserRole};
use crate::error::DomainError;

/// The authenticated user a request acts on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub role: UserRole,
}

/// Records that belong to exactly one company.
pub trait CompanyScoped {
    fn company_id(&self) -> Uuid;
}

macro_rules! company_scoped {
    ($($entity:ty),*) => {
        $(impl CompanyScoped for $entity {
            fn company_id(&self) -> Uuid {
                self.company_id
            }
        })*
    };
}

company_scoped!(Owner, Tenant, Property, Contract, Payment, Lead);

/// Records of another company are reported as missing, never as forbidden.
pub(crate) fn scoped<T: CompanyScoped>(
    found: Option<T>,
    actor: &Actor,
    what: &'static str,
) -> Result<T, DomainError> {
    match found {
        Some(entity) if entity.company_id() == actor.company_id => Ok(entity),
        _ => Err(DomainError::NotFound(what)),
    }
}
