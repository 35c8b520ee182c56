//! Shared application state: services, security helpers and the pool

use std::num::NonZeroU32;
use std::sync::Arc;

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use sqlx::PgPool;

use crm_core::repositories::{
    CompanyRepository, ContractRepository, LeadRepository, MonthlyReportRepository,
    NotificationRepository, OwnerRepository, PartnershipRepository, PaymentRepository,
    PropertyRepository, SettingsRepository, TenantRepository, UserRepository,
};
use crm_core::services::{
    AiProvider, AuthService, CompanyService, ContractDocumentService, ContractService,
    DelinquencyService, LeadService, MarketplaceService, MatchService, NotificationService,
    OwnerService, PartnershipService, PaymentService, PropertyService, ReminderService,
    ReportService, SettingsService, TenantService,
};
use crm_core::DomainError;
use crm_security::session::SessionCookie;
use crm_security::{JwtService, WebhookSigner};
use crm_shared::config::AppConfig;

/// Repository implementations the services are built from.
pub struct Repositories {
    pub companies: Arc<dyn CompanyRepository>,
    pub users: Arc<dyn UserRepository>,
    pub owners: Arc<dyn OwnerRepository>,
    pub tenants: Arc<dyn TenantRepository>,
    pub properties: Arc<dyn PropertyRepository>,
    pub contracts: Arc<dyn ContractRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub leads: Arc<dyn LeadRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub partnerships: Arc<dyn PartnershipRepository>,
    pub reports: Arc<dyn MonthlyReportRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt: JwtService,
    pub session_cookie: SessionCookie,
    pub webhook_signer: WebhookSigner,
    /// Keyed by lower-cased email.
    pub login_limiter: Arc<DefaultKeyedRateLimiter<String>>,

    pub auth: AuthService,
    pub company: CompanyService,
    pub owners: OwnerService,
    pub tenants: TenantService,
    pub properties: PropertyService,
    pub contracts: ContractService,
    pub payments: PaymentService,
    pub leads: LeadService,
    pub notifications: NotificationService,
    pub partnerships: PartnershipService,
    pub settings: SettingsService,
    pub reports: ReportService,
    pub reminders: ReminderService,
    pub delinquency: DelinquencyService,
    pub marketplace: MarketplaceService,
}

impl AppState {
    pub fn new(
        db: PgPool,
        config: &AppConfig,
        repos: Repositories,
        ai: Option<Arc<dyn AiProvider>>,
    ) -> Result<Self, DomainError> {
        let jwt = JwtService::new(config.jwt.secret.clone(), config.jwt.access_token_expiry);
        let per_minute = NonZeroU32::new(config.rate_limit.login_per_minute).unwrap_or(NonZeroU32::MIN);

        let notifications = NotificationService::new(repos.notifications.clone());
        let partnerships = PartnershipService::new(
            repos.partnerships.clone(),
            repos.leads.clone(),
            repos.properties.clone(),
            repos.settings.clone(),
            notifications.clone(),
        );
        let matcher = MatchService::new(
            repos.properties.clone(),
            repos.leads.clone(),
            repos.settings.clone(),
            notifications.clone(),
            partnerships.clone(),
        );
        let leads = LeadService::new(repos.leads.clone(), matcher.clone());
        let documents = ContractDocumentService::new(ai.clone())?;

        Ok(Self {
            db,
            jwt: jwt.clone(),
            session_cookie: SessionCookie::new(config.jwt.cookie_name.clone(), config.jwt.secure_cookie),
            webhook_signer: WebhookSigner::new(
                config.marketplace.olx_webhook_secret.clone(),
                config.marketplace.signature_tolerance_seconds,
            ),
            login_limiter: Arc::new(RateLimiter::keyed(Quota::per_minute(per_minute))),

            auth: AuthService::new(repos.users.clone(), jwt),
            company: CompanyService::new(repos.companies.clone()),
            owners: OwnerService::new(repos.owners.clone()),
            tenants: TenantService::new(repos.tenants.clone()),
            properties: PropertyService::new(
                repos.properties.clone(),
                repos.owners.clone(),
                repos.contracts.clone(),
                matcher,
            ),
            contracts: ContractService::new(
                repos.contracts.clone(),
                repos.properties.clone(),
                repos.tenants.clone(),
                repos.owners.clone(),
                documents,
            ),
            payments: PaymentService::new(repos.payments.clone(), repos.contracts.clone()),
            leads: leads.clone(),
            notifications: notifications.clone(),
            partnerships,
            settings: SettingsService::new(repos.settings.clone()),
            reports: ReportService::new(repos.reports.clone(), repos.contracts.clone(), repos.payments.clone()),
            reminders: ReminderService::new(
                repos.payments.clone(),
                repos.contracts.clone(),
                repos.properties.clone(),
                repos.settings.clone(),
                notifications,
                config.reminders.contract_expiry_days,
            ),
            delinquency: DelinquencyService::new(repos.tenants.clone(), repos.payments.clone(), ai),
            marketplace: MarketplaceService::new(repos.properties, leads),
        })
    }
}
