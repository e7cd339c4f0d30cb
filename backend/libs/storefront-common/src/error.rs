//! Unified error handling for the storefront services
//!
//! One error type serves both transports: actix handlers return it through
//! `ResponseError`, tonic handlers convert it into a `Status`.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for storefront services
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Unified error type for request handling
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Payload failed required-field validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request was well-formed but refers to something unacceptable
    /// (e.g. a product owned by a user that does not exist)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Not found
    #[error("{0} not found")]
    NotFound(String),
}

/// JSON body returned for every REST error
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ServiceError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 422,
            Self::InvalidRequest(_) => 400,
            Self::NotFound(_) => 404,
        }
    }

    /// Validation failure for a required field left empty
    pub fn missing_field(field: &str) -> Self {
        Self::Validation(format!("{} is required", field))
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(ServiceError::status_code(self))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let status = ResponseError::status_code(self);
        HttpResponse::build(status).json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        })
    }
}

/// Convert ServiceError to tonic::Status for gRPC responses
impl From<ServiceError> for tonic::Status {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) | ServiceError::InvalidRequest(msg) => {
                tonic::Status::invalid_argument(msg)
            }
            err @ ServiceError::NotFound(_) => tonic::Status::not_found(err.to_string()),
        }
    }
}
