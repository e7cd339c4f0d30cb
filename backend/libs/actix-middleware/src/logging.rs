//! One access log line per REST request
//!
//! Mounted inside `RequestPipeline`, so the line is nested in the request
//! span and picks up `tracking_id` from it. The route is logged by its
//! pattern (`/users/{user_id}`) when one matched, otherwise by raw path.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{Method, StatusCode},
    Error,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::time::{Duration, Instant};
use tracing::Level;

#[derive(Clone, Copy, Debug, Default)]
pub struct Logging;

impl<S, B> Transform<S, ServiceRequest> for Logging
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = LoggingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggingService { service }))
    }
}

pub struct LoggingService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for LoggingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            // Routing has run by now, so the matched pattern is known
            let request = res.request();
            let route = request
                .match_pattern()
                .unwrap_or_else(|| request.path().to_owned());
            log_completion(request.method(), &route, res.status(), started.elapsed());
            Ok(res)
        })
    }
}

/// Server faults are warnings; everything the client caused is routine
fn level_for(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::WARN
    } else {
        Level::INFO
    }
}

fn log_completion(method: &Method, route: &str, status: StatusCode, elapsed: Duration) {
    let elapsed_ms = elapsed.as_millis() as u64;
    let code = status.as_u16();

    if level_for(status) == Level::WARN {
        tracing::warn!(%method, route, status = code, elapsed_ms, "request failed");
    } else {
        tracing::info!(%method, route, status = code, elapsed_ms, "request served");
    }
}
