//! Repository traits (ports)

pub mod company_repository;
pub mod user_repository;
pub mod owner_repository;
pub mod tenant_repository;
pub mod property_repository;
pub mod contract_repository;
pub mod payment_repository;
pub mod lead_repository;
pub mod notification_repository;
pub mod partnership_repository;
pub mod monthly_report_repository;
pub mod settings_repository;

pub use company_repository::CompanyRepository;
pub use user_repository::UserRepository;
pub use owner_repository::OwnerRepository;
pub use tenant_repository::TenantRepository;
pub use property_repository::PropertyRepository;
pub use contract_repository::ContractRepository;
pub use payment_repository::{PaymentFilter, PaymentRepository};
pub use lead_repository::LeadRepository;
pub use notification_repository::NotificationRepository;
pub use partnership_repository::PartnershipRepository;
pub use monthly_report_repository::MonthlyReportRepository;
pub use settings_repository::SettingsRepository;

#[cfg(test)]
pub use company_repository::MockCompanyRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
#[cfg(test)]
pub use owner_repository::MockOwnerRepository;
#[cfg(test)]
pub use tenant_repository::MockTenantRepository;
#[cfg(test)]
pub use property_repository::MockPropertyRepository;
#[cfg(test)]
pub use contract_repository::MockContractRepository;
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
#[cfg(test)]
pub use lead_repository::MockLeadRepository;
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
#[cfg(test)]
pub use partnership_repository::MockPartnershipRepository;
#[cfg(test)]
pub use monthly_report_repository::MockMonthlyReportRepository;
#[cfg(test)]
pub use settings_repository::MockSettingsRepository;
