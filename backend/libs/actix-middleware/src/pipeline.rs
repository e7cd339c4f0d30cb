//! Request pipeline middleware
//!
//! Outermost middleware of every REST app. For each request it:
//! - generates a fresh tracking value and binds it for the handler's task
//! - opens the `request` span so every log line carries `tracking_id`
//! - increments `requests_total` and records `request_ms_<n>`
//! - stamps `x-tracking-id` on the response, error responses included
//!
//! An inbound `x-tracking-id` is never reused; it is recorded on the span
//! as `upstream` so a call chain can be followed across services.
//!
//! ## Example
//! ```rust,ignore
//! use actix_middleware::RequestPipeline;
//! use actix_web::App;
//!
//! let app = App::new().wrap(RequestPipeline::new(metrics.clone()));
//! ```

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;
use request_context::{context, TrackingId, TRACKING_HEADER};
use std::future::{ready, Ready};
use std::time::Instant;
use storefront_common::metrics::{Metrics, REQUESTS_TOTAL};
use tracing::Instrument;

/// Middleware that runs every request inside its tracking context
#[derive(Clone)]
pub struct RequestPipeline {
    metrics: Metrics,
}

impl RequestPipeline {
    pub fn new(metrics: Metrics) -> Self {
        Self { metrics }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestPipeline
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestPipelineService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestPipelineService {
            service,
            metrics: self.metrics.clone(),
        }))
    }
}

pub struct RequestPipelineService<S> {
    service: S,
    metrics: Metrics,
}

impl<S, B> Service<ServiceRequest> for RequestPipelineService<S>
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
        let tracking_id = TrackingId::generate();
        let upstream = req
            .headers()
            .get(TRACKING_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::to_owned);
        let span = context::request_span(&tracking_id, upstream.as_deref());

        // Store in request extensions for handler access
        req.extensions_mut().insert(tracking_id.clone());

        self.metrics.inc(REQUESTS_TOTAL);
        let metrics = self.metrics.clone();
        let started = Instant::now();

        let fut = context::sync_scope(tracking_id.clone(), || {
            let _entered = span.enter();
            self.service.call(req)
        });

        Box::pin(async move {
            let result = context::scope(tracking_id.clone(), fut.instrument(span)).await;
            metrics.record_latency(started.elapsed());

            let mut res = result?;
            if let Ok(value) = HeaderValue::from_str(tracking_id.as_str()) {
                res.headers_mut()
                    .insert(HeaderName::from_static(TRACKING_HEADER), value);
            }
            Ok(res)
        })
    }
}

/// Tracking value assigned to this request by `RequestPipeline`
pub fn tracking_id(req: &HttpRequest) -> Option<TrackingId> {
    req.extensions().get::<TrackingId>().cloned()
}
