// src/checks/broker.rs
use super::Check;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Raw TCP dial against the broker's host:port. Reachability only, no
/// protocol handshake.
pub struct BrokerCheck {
    addr: String,
    timeout: Duration,
}

impl BrokerCheck {
    pub fn new(addr: String, timeout: Duration) -> Self {
        Self { addr, timeout }
    }
}

#[async_trait]
impl Check for BrokerCheck {
    fn name(&self) -> &str {
        "broker-tcp"
    }

    async fn run(&self) -> Result<()> {
        match timeout(self.timeout, TcpStream::connect(&self.addr)).await {
            // Connection established; dropping the stream closes it.
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(e)) => Err(e).with_context(|| format!("dial {} failed", self.addr)),
            Err(_) => bail!("dial {} timed out after {:?}", self.addr, self.timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn passes_when_listener_accepts() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let check = BrokerCheck::new(addr.to_string(), Duration::from_millis(5000));
        check.run().await.expect("listening port should pass");
    }

    #[tokio::test]
    async fn fails_when_nothing_listens() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let check = BrokerCheck::new(addr.to_string(), Duration::from_millis(5000));
        let start = Instant::now();
        let err = check.run().await.unwrap_err();
        assert!(err.to_string().contains("dial"), "got: {err}");
        assert!(start.elapsed() < Duration::from_millis(5000));
    }
}
