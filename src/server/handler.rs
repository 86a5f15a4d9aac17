// src/server/handler.rs
use crate::registry::{Evaluation, Registry};
use hyper::header::CONTENT_TYPE;
use hyper::{Body, Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;
use tower::Service;

/// Routes the two probe paths to readiness evaluation. Stateless: every
/// request triggers exactly one fresh round of checks.
#[derive(Clone)]
pub struct RequestHandler {
    registry: Arc<Registry>,
}

impl RequestHandler {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    async fn route(registry: Arc<Registry>, req: Request<Body>) -> Response<Body> {
        match (req.method(), req.uri().path()) {
            // Any method on /health probes readiness.
            (_, "/health") => {
                let evaluation = registry.evaluate_readiness().await;
                respond(&evaluation, false)
            }
            // HEAD on the root is downgraded to a readiness GET; the
            // status carries the verdict, the body stays empty.
            (&Method::HEAD, "/") => {
                let evaluation = registry.evaluate_readiness().await;
                respond(&evaluation, true)
            }
            _ => Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Body::from("Not Found"))
                .unwrap(),
        }
    }
}

fn respond(evaluation: &Evaluation, head: bool) -> Response<Body> {
    let status = if evaluation.healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = if head {
        Body::empty()
    } else {
        Body::from(evaluation.to_body())
    };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap()
}

impl Service<Request<Body>> for RequestHandler {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let registry = self.registry.clone();
        Box::pin(async move { Ok(Self::route(registry, req).await) })
    }
}
