use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crm_api::{build_router, AppState, Repositories};
use crm_core::services::AiProvider;
use crm_infrastructure::{
    create_pool, run_migrations, LlmClient, LlmClientConfig, PgCompanyRepository,
    PgContractRepository, PgLeadRepository, PgMonthlyReportRepository, PgNotificationRepository,
    PgOwnerRepository, PgPartnershipRepository, PgPaymentRepository, PgPropertyRepository,
    PgSettingsRepository, PgTenantRepository, PgUserRepository,
};
use crm_shared::config::AppConfig;

mod scheduler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // Keep the guard alive so buffered log lines are flushed on exit.
    let _guard = crm_shared::telemetry::init_telemetry(&config.log)?;
    info!("{} starting ({})", config.app.name, config.app.env);

    let pool = create_pool(&config.database).await?;
    if config.database.run_migrations {
        run_migrations(&pool).await?;
    }

    let repos = Repositories {
        companies: Arc::new(PgCompanyRepository::new(pool.clone())),
        users: Arc::new(PgUserRepository::new(pool.clone())),
        owners: Arc::new(PgOwnerRepository::new(pool.clone())),
        tenants: Arc::new(PgTenantRepository::new(pool.clone())),
        properties: Arc::new(PgPropertyRepository::new(pool.clone())),
        contracts: Arc::new(PgContractRepository::new(pool.clone())),
        payments: Arc::new(PgPaymentRepository::new(pool.clone())),
        leads: Arc::new(PgLeadRepository::new(pool.clone())),
        notifications: Arc::new(PgNotificationRepository::new(pool.clone())),
        partnerships: Arc::new(PgPartnershipRepository::new(pool.clone())),
        reports: Arc::new(PgMonthlyReportRepository::new(pool.clone())),
        settings: Arc::new(PgSettingsRepository::new(pool.clone())),
    };

    let ai: Option<Arc<dyn AiProvider>> = if config.ai.enabled {
        let client = LlmClient::new(LlmClientConfig {
            base_url: config.ai.base_url.clone(),
            model: config.ai.model.clone(),
            api_key: config.ai.api_key.clone(),
            timeout_seconds: config.ai.timeout_seconds,
            max_tokens: config.ai.max_tokens,
        })?;
        info!("AI provider enabled: {} at {}", config.ai.model, config.ai.base_url);
        Some(Arc::new(client))
    } else {
        warn!("AI provider disabled, contract documents use the template only");
        None
    };

    let state = AppState::new(pool, &config, repos, ai)?;

    if config.reminders.enabled {
        tokio::spawn(scheduler::run_reminders(
            state.reminders.clone(),
            config.reminders.interval_seconds,
        ));
    }

    let cors = CorsLayer::new()
        .allow_origin(config.app.cors_origin.parse::<HeaderValue>()?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    let app = build_router(state).layer(cors);

    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
