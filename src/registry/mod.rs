// src/registry/mod.rs
mod evaluation;

pub use evaluation::Evaluation;

use crate::checks::Check;
use anyhow::{bail, Result};
use futures::future::join_all;
use tracing::warn;

/// Liveness and readiness check sets, registered once at startup and
/// immutable afterwards. Readiness evaluation includes the liveness set:
/// a process that should be restarted should not receive traffic either.
#[derive(Default)]
pub struct Registry {
    liveness: Vec<Box<dyn Check>>,
    readiness: Vec<Box<dyn Check>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_liveness(&mut self, check: Box<dyn Check>) -> Result<()> {
        Self::add(&mut self.liveness, check, "liveness")
    }

    pub fn add_readiness(&mut self, check: Box<dyn Check>) -> Result<()> {
        Self::add(&mut self.readiness, check, "readiness")
    }

    fn add(set: &mut Vec<Box<dyn Check>>, check: Box<dyn Check>, category: &str) -> Result<()> {
        if set.iter().any(|c| c.name() == check.name()) {
            bail!("duplicate {category} check {:?}", check.name());
        }
        set.push(check);
        Ok(())
    }

    /// Run the liveness set only.
    pub async fn evaluate_liveness(&self) -> Evaluation {
        Self::evaluate(self.liveness.iter().map(|c| c.as_ref())).await
    }

    /// Run every readiness check plus every liveness check.
    pub async fn evaluate_readiness(&self) -> Evaluation {
        let all = self.readiness.iter().chain(self.liveness.iter());
        Self::evaluate(all.map(|c| c.as_ref())).await
    }

    /// Checks run concurrently; evaluation latency is bounded by the
    /// slowest individual check timeout, not their sum.
    async fn evaluate<'a, I>(checks: I) -> Evaluation
    where
        I: Iterator<Item = &'a dyn Check>,
    {
        let probes = checks.map(|check| async move {
            let result = check.run().await;
            (check.name().to_string(), result)
        });

        let mut evaluation = Evaluation::new();
        for (name, result) in join_all(probes).await {
            if let Err(e) = result {
                warn!(check = %name, error = %e, "check failed");
                evaluation.record_failure(name, format!("{e:#}"));
            }
        }
        evaluation
    }
}
