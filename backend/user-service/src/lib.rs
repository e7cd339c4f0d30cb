pub mod config;
pub mod grpc;
pub mod http;

pub use config::Config;
pub use grpc::UserServiceImpl;
