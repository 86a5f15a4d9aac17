// src/main.rs
use anyhow::{Context, Result};
use healthcheckd::config;
use healthcheckd::health::HealthChecker;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("healthcheckd=debug".parse()?)
                .add_directive("hyper=info".parse()?),
        )
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());

    info!("Loading configuration from: {}", config_path);
    let config = config::load_config(&config_path).await?;

    let root_certs = match &config.tls.ca_cert {
        Some(path) => config::load_root_certs(path)?,
        None => Vec::new(),
    };

    // Lazy pool: the first ping check surfaces connection problems, the
    // process does not block on the database at startup.
    let db = PgPoolOptions::new()
        .max_connections(2)
        .connect_lazy(&config.database.url)
        .context("Invalid database URL")?;

    info!("Starting health endpoints on port {}", config.server.port);
    let checker = HealthChecker::new(config.server.port, db, &config, root_certs);

    // A listener failure propagates out of main and kills the process:
    // an orchestrator must never poll a half-dead health endpoint.
    checker.run().await
}
