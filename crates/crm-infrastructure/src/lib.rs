//! # CRM Infrastructure
//!
//! PostgreSQL repositories and the HTTP AI provider (adapters).

pub mod ai;
pub mod database;

pub use ai::{LlmClient, LlmClientConfig};
pub use database::{
    create_pool, run_migrations, PgCompanyRepository, PgContractRepository, PgLeadRepository,
    PgMonthlyReportRepository, PgNotificationRepository, PgOwnerRepository, PgPartnershipRepository,
    PgPaymentRepository, PgPropertyRepository, PgSettingsRepository, PgTenantRepository,
    PgUserRepository,
};
