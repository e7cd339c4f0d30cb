//! Storefront Common Library
//!
//! Shared types and utilities for the storefront services and the monolith.
//! The same building blocks back both deployment shapes, so the only
//! difference between them is how the pieces are wired.

pub mod directory;
pub mod error;
pub mod handlers;
pub mod ids;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod repository;
pub mod shutdown;

pub use directory::UserDirectory;
pub use error::{Result, ServiceError};
pub use ids::generate_id;
pub use metrics::{Metrics, MetricsSnapshot};

pub use models::{Product, ProductCreate, User, UserCreate};
pub use repository::{Entity, InMemoryRepository, ProductRepository, UserRepository};
