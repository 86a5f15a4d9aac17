// src/checks/tasks.rs
use super::Check;
use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::runtime::Handle;

/// Internal liveness check: fails when the number of alive tokio tasks
/// exceeds the threshold. Catches runaway fan-out before the process
/// exhausts memory or file descriptors.
pub struct TaskCountCheck {
    threshold: usize,
}

impl TaskCountCheck {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }
}

#[async_trait]
impl Check for TaskCountCheck {
    fn name(&self) -> &str {
        "task-threshold"
    }

    async fn run(&self) -> Result<()> {
        let alive = Handle::current().metrics().num_alive_tasks();
        if alive > self.threshold {
            bail!("too many tasks ({alive} > {})", self.threshold);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn passes_below_threshold() {
        let check = TaskCountCheck::new(100);
        check.run().await.expect("idle runtime should pass");
    }

    #[tokio::test]
    async fn fails_when_tasks_pile_up() {
        let mut handles = Vec::new();
        for _ in 0..150 {
            handles.push(tokio::spawn(tokio::time::sleep(Duration::from_secs(5))));
        }

        let check = TaskCountCheck::new(100);
        let err = check.run().await.unwrap_err();
        assert!(err.to_string().contains("too many tasks"), "got: {err}");

        for handle in handles {
            handle.abort();
        }
    }
}
