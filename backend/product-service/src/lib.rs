pub mod catalog;
pub mod clients;
pub mod config;
pub mod grpc;
pub mod http;

pub use catalog::ProductCatalog;
pub use config::{Config, UserServiceTransport};
pub use grpc::ProductServiceImpl;
