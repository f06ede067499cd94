use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use marketplace::{
    config::{AppConfig, StorageBackend},
    create_router,
    middleware::TokenVerifier,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting marketplace service");

    let config = AppConfig::load()?;
    let verifier = TokenVerifier::from_config(&config.auth)?;

    let app_state = match config.storage {
        StorageBackend::Postgres => {
            // Initialize database connection pool
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            if health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            run_migrations(&pool).await?;
            AppState::postgres(pool, verifier)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; all data is lost on shutdown");
            AppState::in_memory(verifier)
        }
    };

    info!("Marketplace service initialized successfully");

    let app = create_router(app_state);

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Marketplace service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
