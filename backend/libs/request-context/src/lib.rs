//! Request tracking context
//!
//! Every inbound request, REST or gRPC, is assigned a tracking value
//! (`req_xxxxxxxx`) that is reachable from anywhere in that request's call
//! tree without being passed as an argument.
//!
//! ## Flow
//! ```text
//! inbound request
//!   ↓ pipeline generates TrackingId, opens `request` span
//! handler (task-local scope)
//!   ↓ context::current() / log lines carry tracking_id
//! outbound call to another service
//!   ↓ x-tracking-id header / metadata (recorded upstream as `upstream`)
//! response
//!   ↓ x-tracking-id header
//! ```

pub mod context;
pub mod grpc;

pub use context::{current, current_or_untracked, scope, spawn, TrackingId, UNTRACKED};

/// Header (HTTP) and metadata key (gRPC) carrying the tracking value
pub const TRACKING_HEADER: &str = "x-tracking-id";
