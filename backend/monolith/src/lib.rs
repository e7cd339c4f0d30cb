//! Users and Products in a single process
//!
//! The same handlers and gRPC services the standalone services expose, wired
//! over one shared data layer. Product owners are checked directly against
//! the in-process user store instead of over the network.

pub mod config;

use std::sync::Arc;

use actix_web::web;
use product_service::grpc::proto::product_service_server::ProductServiceServer;
use product_service::{ProductCatalog, ProductServiceImpl};
use storefront_common::directory::LocalUserDirectory;
use storefront_common::{handlers, Metrics, ProductRepository, UserRepository};
use user_service::grpc::proto::user_service_server::UserServiceServer;
use user_service::UserServiceImpl;

pub use config::Config;

/// Shared state of the monolith; clones share the same stores
#[derive(Clone)]
pub struct Monolith {
    pub users: UserRepository,
    pub catalog: ProductCatalog,
    pub metrics: Metrics,
}

impl Default for Monolith {
    fn default() -> Self {
        Self::new()
    }
}

impl Monolith {
    pub fn new() -> Self {
        let users = UserRepository::new();
        let directory = Arc::new(LocalUserDirectory::new(users.clone()));
        let catalog = ProductCatalog::new(ProductRepository::new(), directory);

        Self {
            users,
            catalog,
            metrics: Metrics::new(),
        }
    }

    /// Register shared state plus `/users`, `/products`, `/health` and `/metrics`
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.users.clone()))
            .app_data(web::Data::new(self.catalog.clone()))
            .app_data(web::Data::new(self.metrics.clone()))
            .app_data(handlers::json_config());

        handlers::configure(cfg);
        user_service::http::configure(cfg);
        product_service::http::configure(cfg);
    }

    pub fn user_grpc(&self) -> UserServiceServer<UserServiceImpl> {
        UserServiceImpl::new(self.users.clone()).into_server()
    }

    pub fn product_grpc(&self) -> ProductServiceServer<ProductServiceImpl> {
        ProductServiceImpl::new(self.catalog.clone()).into_server()
    }
}
