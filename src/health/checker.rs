// src/health/checker.rs
use crate::checks::{BrokerCheck, DatabaseCheck, StorageCheck, TaskCountCheck};
use crate::config::Config;
use crate::registry::Registry;
use crate::server::{RequestHandler, ServerBuilder};
use anyhow::Result;
use reqwest::Certificate;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const STORAGE_TIMEOUT: Duration = Duration::from_millis(5000);
const BROKER_TIMEOUT: Duration = Duration::from_millis(5000);
const DATABASE_TIMEOUT: Duration = Duration::from_millis(1000);
const MAX_ALIVE_TASKS: usize = 100;

/// Top-level assembly: resolves the probe targets from configuration
/// once at startup and serves the readiness endpoints. Immutable after
/// construction and shared read-only across requests.
pub struct HealthChecker {
    port: u16,
    db: PgPool,
    storage_url: String,
    broker_addr: String,
    root_certs: Vec<Certificate>,
    server_cert: Option<PathBuf>,
    server_key: Option<PathBuf>,
}

impl HealthChecker {
    /// Assembles the storage readiness URL as `scheme://host[:port][path]`
    /// and the broker address as `host:port`. Pure string assembly;
    /// malformed addresses only surface when a probe runs.
    pub fn new(port: u16, db: PgPool, config: &Config, root_certs: Vec<Certificate>) -> Self {
        let mut storage_url = config.storage.url.clone();
        if config.storage.port != 0 {
            storage_url = format!("{storage_url}:{}", config.storage.port);
        }
        if !config.storage.ready_path.is_empty() {
            storage_url.push_str(&config.storage.ready_path);
        }

        let broker_addr = format!("{}:{}", config.broker.host, config.broker.port);

        Self {
            port,
            db,
            storage_url,
            broker_addr,
            root_certs,
            server_cert: config.server.cert.clone(),
            server_key: config.server.key.clone(),
        }
    }

    /// Register the full check set: three readiness probes against the
    /// external dependencies plus the internal task-count liveness check.
    pub fn registry(&self) -> Result<Registry> {
        let mut registry = Registry::new();

        registry.add_liveness(Box::new(TaskCountCheck::new(MAX_ALIVE_TASKS)))?;

        registry.add_readiness(Box::new(StorageCheck::new(
            self.storage_url.clone(),
            &self.root_certs,
            STORAGE_TIMEOUT,
        )?))?;
        registry.add_readiness(Box::new(BrokerCheck::new(
            self.broker_addr.clone(),
            BROKER_TIMEOUT,
        )))?;
        registry.add_readiness(Box::new(DatabaseCheck::new(
            self.db.clone(),
            DATABASE_TIMEOUT,
        )))?;

        Ok(registry)
    }

    /// Serve the endpoints until listener failure. The error is fatal to
    /// the process: without a working health endpoint the orchestrator
    /// cannot make scheduling decisions.
    pub async fn run(&self) -> Result<()> {
        let registry = Arc::new(self.registry()?);
        let handler = RequestHandler::new(registry);

        let addr: SocketAddr = ([0, 0, 0, 0], self.port).into();
        let mut builder = ServerBuilder::new(addr).with_handler(handler);
        if let (Some(cert), Some(key)) = (&self.server_cert, &self.server_key) {
            builder = builder.with_tls(cert.clone(), key.clone());
        }

        builder.serve().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BrokerConfig, DatabaseConfig, ServerConfig, StorageConfig, TlsConfig};
    use sqlx::postgres::PgPoolOptions;

    fn config(url: &str, port: u16, ready_path: &str) -> Config {
        Config {
            server: ServerConfig {
                port: 8080,
                cert: None,
                key: None,
            },
            storage: StorageConfig {
                url: url.to_string(),
                port,
                ready_path: ready_path.to_string(),
            },
            broker: BrokerConfig {
                host: "mq.example.com".to_string(),
                port: 5671,
            },
            database: DatabaseConfig {
                url: "postgres://ping:pw@db:5432/archive".to_string(),
            },
            tls: TlsConfig::default(),
        }
    }

    fn pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://ping:pw@db:5432/archive")
            .unwrap()
    }

    fn checker(config: &Config) -> HealthChecker {
        HealthChecker::new(config.server.port, pool(), config, Vec::new())
    }

    #[tokio::test]
    async fn storage_url_with_port_and_path() {
        let checker = checker(&config("https://storage.example.com", 9000, "/ready"));
        assert_eq!(checker.storage_url, "https://storage.example.com:9000/ready");
    }

    #[tokio::test]
    async fn storage_url_omits_zero_port() {
        let checker = checker(&config("https://storage.example.com", 0, "/ready"));
        assert_eq!(checker.storage_url, "https://storage.example.com/ready");
    }

    #[tokio::test]
    async fn storage_url_omits_empty_path() {
        let checker = checker(&config("https://storage.example.com", 9000, ""));
        assert_eq!(checker.storage_url, "https://storage.example.com:9000");
    }

    #[tokio::test]
    async fn broker_addr_is_host_port() {
        let checker = checker(&config("https://storage.example.com", 0, ""));
        assert_eq!(checker.broker_addr, "mq.example.com:5671");
    }

    #[tokio::test]
    async fn registry_builds_with_unique_names() {
        let checker = checker(&config("https://storage.example.com", 9000, "/ready"));
        let registry = checker.registry().unwrap();

        // Only the task-count check is in the liveness set and it passes
        // on an idle test runtime.
        let liveness = registry.evaluate_liveness().await;
        assert!(liveness.healthy());
    }
}
