// src/checks/storage.rs
use super::Check;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Certificate, Client, StatusCode};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
#[error("returned status {0}")]
pub struct UnexpectedStatus(pub u16);

/// HTTPS GET against the storage backend's readiness URL. The first
/// response decides the outcome; redirects are never followed.
pub struct StorageCheck {
    url: String,
    client: Client,
}

impl StorageCheck {
    /// When `root_certs` is non-empty the client trusts only that bundle;
    /// otherwise the built-in roots apply.
    pub fn new(url: String, root_certs: &[Certificate], timeout: Duration) -> Result<Self> {
        let mut builder = Client::builder()
            .use_rustls_tls()
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            .timeout(timeout)
            .redirect(Policy::none());

        if !root_certs.is_empty() {
            builder = builder.tls_built_in_root_certs(false);
            for cert in root_certs {
                builder = builder.add_root_certificate(cert.clone());
            }
        }

        let client = builder
            .build()
            .context("Failed to create storage probe client")?;

        Ok(Self { url, client })
    }
}

#[async_trait]
impl Check for StorageCheck {
    fn name(&self) -> &str {
        "storage-http"
    }

    async fn run(&self) -> Result<()> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("GET {} failed", self.url))?;

        let status = response.status();
        // Body is dropped unread; only the status matters.
        if status != StatusCode::OK {
            return Err(UnexpectedStatus(status.as_u16()).into());
        }

        Ok(())
    }
}
