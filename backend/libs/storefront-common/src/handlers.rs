//! Operational endpoints mounted at every service root

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::ServiceError;
use crate::metrics::Metrics;

pub async fn health() -> HttpResponse {
    tracing::info!("health check");
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub async fn metrics(metrics: web::Data<Metrics>) -> HttpResponse {
    HttpResponse::Ok().json(metrics.snapshot())
}

/// JSON extractor config turning malformed or incomplete payloads into 422
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "rejected request payload");
        ServiceError::Validation(err.to_string()).into()
    })
}

/// Register `GET /health` and `GET /metrics`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/metrics", web::get().to(metrics));
}
