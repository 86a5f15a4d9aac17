// ────────────────────────────────
// src/server/builder.rs
// ────────────────────────────────
use crate::server::listener::{bind_tcp, load_tls_acceptor, TimeoutStream};
use anyhow::{Context as _, Result};
use hyper::server::conn::Http;
use hyper::{Body, Request, Response};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tower::Service;

/// Connection hygiene limits protecting the endpoint from slow clients.
#[derive(Debug, Clone, Copy)]
pub struct ServerTimeouts {
    pub read: Duration,
    pub write: Duration,
    pub idle: Duration,
    pub read_header: Duration,
}

impl Default for ServerTimeouts {
    fn default() -> Self {
        Self {
            read: Duration::from_secs(5),
            write: Duration::from_secs(5),
            idle: Duration::from_secs(30),
            read_header: Duration::from_secs(3),
        }
    }
}

/// Builder pattern so the checker can inject its handler and, when
/// configured, a server cert/key pair for TLS termination.
pub struct ServerBuilder<H>
where
    H: Service<Request<Body>, Response = Response<Body>> + Send + Clone + 'static,
    H::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    H::Future: Send + 'static,
{
    addr: SocketAddr,
    handler: Option<H>,
    timeouts: ServerTimeouts,
    tls: Option<(PathBuf, PathBuf)>,
}

impl<H> ServerBuilder<H>
where
    H: Service<Request<Body>, Response = Response<Body>> + Send + Clone + 'static,
    H::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    H::Future: Send + 'static,
{
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            handler: None,
            timeouts: ServerTimeouts::default(),
            tls: None,
        }
    }

    /// Inject the request handler (usually wraps the check registry).
    pub fn with_handler(mut self, handler: H) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn with_timeouts(mut self, timeouts: ServerTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Serve over TLS with the given PEM cert chain and key files.
    pub fn with_tls(mut self, cert: PathBuf, key: PathBuf) -> Self {
        self.tls = Some((cert, key));
        self
    }

    /// Bind the listener without accepting yet. Bind or cert-loading
    /// failures surface here, before the caller commits to serving.
    pub async fn bind(self) -> Result<Server<H>> {
        let handler = self
            .handler
            .context("handler must be set via with_handler()")?;

        let acceptor = match &self.tls {
            Some((cert, key)) => Some(load_tls_acceptor(cert, key)?),
            None => None,
        };

        let listener = bind_tcp(self.addr).await?;
        Ok(Server {
            listener,
            handler,
            timeouts: self.timeouts,
            acceptor,
        })
    }

    /// Consume the builder, boot the listener, and serve until failure.
    pub async fn serve(self) -> Result<()> {
        self.bind().await?.serve().await
    }
}

pub struct Server<H>
where
    H: Service<Request<Body>, Response = Response<Body>> + Send + Clone + 'static,
    H::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    H::Future: Send + 'static,
{
    listener: TcpListener,
    handler: H,
    timeouts: ServerTimeouts,
    acceptor: Option<TlsAcceptor>,
}

impl<H> Server<H>
where
    H: Service<Request<Body>, Response = Response<Body>> + Send + Clone + 'static,
    H::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    H::Future: Send + 'static,
{
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().context("listener has no address")
    }

    /// Accept loop, one Tokio task per connection. An accept error is
    /// returned to the caller and treated as fatal.
    pub async fn serve(self) -> Result<()> {
        let scheme = if self.acceptor.is_some() { "https" } else { "http" };
        tracing::info!("{} endpoint listening on {}", scheme, self.local_addr()?);

        let mut http = Http::new();
        http.http1_header_read_timeout(self.timeouts.read_header);

        loop {
            let (stream, peer) = self.listener.accept().await.context("accept failed")?;
            let svc = self.handler.clone();
            let http = http.clone();
            let timeouts = self.timeouts;

            match self.acceptor.clone() {
                Some(acceptor) => {
                    tokio::spawn(async move {
                        let tls_stream = match acceptor.accept(stream).await {
                            Ok(s) => s,
                            Err(err) => {
                                tracing::warn!(%peer, %err, "TLS handshake failed");
                                return;
                            }
                        };
                        let io = TimeoutStream::new(
                            tls_stream,
                            timeouts.read,
                            timeouts.write,
                            timeouts.idle,
                        );
                        if let Err(err) = http.serve_connection(io, svc).await {
                            tracing::warn!(%peer, %err, "connection error");
                        }
                    });
                }
                None => {
                    tokio::spawn(async move {
                        let io = TimeoutStream::new(
                            stream,
                            timeouts.read,
                            timeouts.write,
                            timeouts.idle,
                        );
                        if let Err(err) = http.serve_connection(io, svc).await {
                            tracing::warn!(%peer, %err, "connection error");
                        }
                    });
                }
            }
        }
    }
}
