// src/checks/database.rs
use super::Check;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Duration;
use tokio::time::timeout;

/// Liveness ping against the shared database pool. Runs `SELECT 1`, no
/// schema access.
pub struct DatabaseCheck {
    pool: PgPool,
    timeout: Duration,
}

impl DatabaseCheck {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl Check for DatabaseCheck {
    fn name(&self) -> &str {
        "database"
    }

    async fn run(&self) -> Result<()> {
        match timeout(self.timeout, sqlx::query("SELECT 1").execute(&self.pool)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(e).context("database ping failed"),
            Err(_) => bail!("database ping timed out after {:?}", self.timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;
    use std::time::Instant;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn fails_within_timeout_when_database_is_down() {
        // Reserve a port with no postgres behind it.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let pool = PgPoolOptions::new()
            .connect_lazy(&format!("postgres://ping:pw@127.0.0.1:{port}/health"))
            .unwrap();

        let check = DatabaseCheck::new(pool, Duration::from_millis(1000));
        let start = Instant::now();
        assert!(check.run().await.is_err());
        assert!(start.elapsed() < Duration::from_millis(2000));
    }
}
