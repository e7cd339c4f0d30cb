//! gRPC side of the request pipeline
//!
//! `TrackingLayer` wraps the tonic router so every RPC gets a fresh
//! tracking value, is counted, and has its latency recorded. The value is
//! echoed back in the `x-tracking-id` response header.
//!
//! `TrackingInjector` is the client-side counterpart: it copies the current
//! tracking value into outgoing metadata so the callee can log it as
//! `upstream`.

use std::task::{Context, Poll};
use std::time::Instant;

use futures::future::BoxFuture;
use storefront_common::metrics::{Metrics, REQUESTS_TOTAL};
use tonic::codegen::http::{HeaderValue, Request, Response};
use tonic::metadata::MetadataValue;
use tonic::service::Interceptor;
use tonic::Status;
use tower::{Layer, Service};
use tracing::Instrument;

use crate::context::{self, TrackingId};
use crate::TRACKING_HEADER;

/// Tower layer applied with `Server::builder().layer(..)`
#[derive(Clone, Debug)]
pub struct TrackingLayer {
    metrics: Metrics,
}

impl TrackingLayer {
    pub fn new(metrics: Metrics) -> Self {
        Self { metrics }
    }
}

impl<S> Layer<S> for TrackingLayer {
    type Service = TrackingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TrackingService {
            inner,
            metrics: self.metrics.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TrackingService<S> {
    inner: S,
    metrics: Metrics,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for TrackingService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // The readied service must be the one that handles this call
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let metrics = self.metrics.clone();

        let id = TrackingId::generate();
        let upstream = req
            .headers()
            .get(TRACKING_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let method = req.uri().path().to_owned();
        let span = context::request_span(&id, upstream.as_deref());

        metrics.inc(REQUESTS_TOTAL);
        let started = Instant::now();

        let fut = context::sync_scope(id.clone(), || {
            let _entered = span.enter();
            inner.call(req)
        });

        Box::pin(async move {
            let result = context::scope(id.clone(), fut.instrument(span.clone())).await;

            let elapsed = started.elapsed();
            metrics.record_latency(elapsed);
            span.in_scope(|| {
                tracing::debug!(
                    method = %method,
                    elapsed_ms = elapsed.as_millis() as u64,
                    ok = result.is_ok(),
                    "grpc request handled"
                );
            });

            result.map(|mut response| {
                if let Ok(value) = HeaderValue::from_str(id.as_str()) {
                    response.headers_mut().insert(TRACKING_HEADER, value);
                }
                response
            })
        })
    }
}

/// Client interceptor forwarding the current tracking value
#[derive(Clone, Copy, Debug, Default)]
pub struct TrackingInjector;

impl Interceptor for TrackingInjector {
    fn call(&mut self, mut request: tonic::Request<()>) -> Result<tonic::Request<()>, Status> {
        if let Some(id) = context::current() {
            if let Ok(value) = MetadataValue::try_from(id.as_str()) {
                request.metadata_mut().insert(TRACKING_HEADER, value);
            }
        }
        Ok(request)
    }
}
