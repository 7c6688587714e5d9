use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod filters;
mod jwt;
mod middleware;
mod models;
mod password;
mod query;
mod repositories;
mod routes;
mod state;
mod validation;

use common::database::{self, DatabaseConfig};

use crate::{
    config::AppConfig,
    jwt::{JwtConfig, JwtService},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting inventory service");

    let app_config = AppConfig::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    if app_config.run_migrations {
        database::run_migrations(&pool).await?;
    }

    // Initialize JWT service
    let jwt_service = JwtService::new(JwtConfig::from_env()?)?;
    info!(
        "Access tokens expire after {}s",
        jwt_service.access_token_expiry()
    );

    let app_state = AppState::new(pool, jwt_service);

    // Start the web server
    let app = routes::create_router(app_state);

    let address = app_config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Inventory service listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Inventory service stopped");
    Ok(())
}

/// Resolve once the process is asked to stop
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down inventory service");
}
