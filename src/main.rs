//! ShambaCredit USSD Service
//!
//! Main application entry point

use std::net::SocketAddr;
use std::sync::Arc;

use dotenv::dotenv;
use tracing::info;

use ShambaCredit::{
    config::Settings,
    database::{connection, DatabaseService},
    handlers::{create_router, AppState},
    services::SmsService,
    state::RedisSessionStore,
    ussd::UssdEngine,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard keeps the file writer alive
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting ShambaCredit USSD service...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = connection::DatabaseConfig {
        url: settings.database.url.clone(),
        max_connections: settings.database.max_connections,
        min_connections: settings.database.min_connections,
        acquire_timeout: std::time::Duration::from_secs(30),
        idle_timeout: Some(std::time::Duration::from_secs(600)),
        max_lifetime: Some(std::time::Duration::from_secs(1800)),
    };
    let pool = connection::create_pool(&db_config).await?;

    // Run database migrations
    connection::run_migrations(&pool).await?;

    // Initialize the session store
    info!("Connecting to Redis...");
    let sessions = Arc::new(RedisSessionStore::new(settings.redis.clone()).await?);

    // Initialize services
    let database = Arc::new(DatabaseService::new(pool.clone()));
    let sms = Arc::new(SmsService::new(settings.sms.clone())?);

    // Wire up the menu state machine
    let engine = Arc::new(UssdEngine::new(
        sessions,
        database,
        sms,
        chrono::Duration::seconds(settings.redis.session_ttl_seconds as i64),
        settings.payments.paybill.clone(),
    ));

    let state = AppState { engine, pool };
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    info!("USSD gateway endpoint listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    info!("ShambaCredit USSD service has been shut down.");

    Ok(())
}
