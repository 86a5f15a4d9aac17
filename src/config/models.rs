// src/config/models.rs
use anyhow::{bail, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub broker: BrokerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub tls: TlsConfig,
}

/// Where the endpoint server listens. TLS is enabled when both `cert`
/// and `key` are set.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    #[serde(default)]
    pub cert: Option<PathBuf>,
    #[serde(default)]
    pub key: Option<PathBuf>,
}

/// Object storage backend. `url` carries the scheme and host; `port` and
/// `ready_path` are appended when set.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub url: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub ready_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Trust material for outbound probes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfig {
    /// PEM bundle of root CAs to trust for the storage probe. When unset
    /// the client's built-in roots are used.
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }
        if self.server.cert.is_some() != self.server.key.is_some() {
            bail!("server.cert and server.key must be set together");
        }
        if self.storage.url.is_empty() {
            bail!("storage.url must not be empty");
        }
        if self.broker.host.is_empty() {
            bail!("broker.host must not be empty");
        }
        if self.broker.port == 0 {
            bail!("broker.port must be non-zero");
        }
        if self.database.url.is_empty() {
            bail!("database.url must not be empty");
        }
        Ok(())
    }
}
