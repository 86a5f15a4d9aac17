// src/checks/mod.rs
mod broker;
mod database;
mod storage;
mod tasks;

pub use broker::BrokerCheck;
pub use database::DatabaseCheck;
pub use storage::StorageCheck;
pub use tasks::TaskCountCheck;

use anyhow::Result;
use async_trait::async_trait;

/// A single bounded-time probe against one dependency. Checks carry no
/// mutable state and are invoked once per incoming evaluation request.
#[async_trait]
pub trait Check: Send + Sync {
    fn name(&self) -> &str;

    /// Run the probe once. `Err` carries the failure detail reported to
    /// the orchestrator.
    async fn run(&self) -> Result<()>;
}
