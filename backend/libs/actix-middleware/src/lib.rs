//! # Actix Middleware Library
//!
//! Middleware shared by every storefront REST app
//!
//! ## Modules
//! - `pipeline`: tracking context, request counting and latency
//! - `logging`: access log line per request

pub mod logging;
pub mod pipeline;

pub use logging::Logging;
pub use pipeline::{tracking_id, RequestPipeline};
