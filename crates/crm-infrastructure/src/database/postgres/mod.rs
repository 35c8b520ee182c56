//! PostgreSQL repository implementations

pub mod company_repo_impl;
pub mod user_repo_impl;
pub mod owner_repo_impl;
pub mod tenant_repo_impl;
pub mod property_repo_impl;
pub mod contract_repo_impl;
pub mod payment_repo_impl;
pub mod lead_repo_impl;
pub mod notification_repo_impl;
pub mod partnership_repo_impl;
pub mod monthly_report_repo_impl;
pub mod settings_repo_impl;

pub use company_repo_impl::PgCompanyRepository;
pub use user_repo_impl::PgUserRepository;
pub use owner_repo_impl::PgOwnerRepository;
pub use tenant_repo_impl::PgTenantRepository;
pub use property_repo_impl::PgPropertyRepository;
pub use contract_repo_impl::PgContractRepository;
pub use payment_repo_impl::PgPaymentRepository;
pub use lead_repo_impl::PgLeadRepository;
pub use notification_repo_impl::PgNotificationRepository;
pub use partnership_repo_impl::PgPartnershipRepository;
pub use monthly_report_repo_impl::PgMonthlyReportRepository;
pub use settings_repo_impl::PgSettingsRepository;

use crm_core::error::DomainError;
use tracing::error;

/// Logs the failure and converts it to a domain error.
pub(crate) fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

/// Name of the violated unique constraint, if `e` is a unique violation.
pub(crate) fn unique_violation(e: &sqlx::Error) -> Option<String> {
    match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            Some(db.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

/// True when `e` is a foreign key violation (row still referenced).
pub(crate) fn foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

/// Reads a TEXT enum column, failing loudly on values the domain does not know.
pub(crate) fn parse_enum<T>(column: &str, value: &str, parse: fn(&str) -> Option<T>) -> Result<T, DomainError> {
    parse(value).ok_or_else(|| {
        error!("Unknown {} value in database: {}", column, value);
        DomainError::DatabaseError(format!("unknown {} value: {}", column, value))
    })
}
