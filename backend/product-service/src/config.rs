/// Configuration management for Product Service
///
/// Loads configuration from environment variables, optionally seeded from a
/// `.env` file.
use anyhow::Context;
use grpc_clients::{GrpcConfig, GrpcUserDirectory};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use storefront_common::logging::LogFormat;
use storefront_common::UserDirectory;

use crate::clients::HttpUserDirectory;

/// Transport used to ask the User service whether a product owner exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserServiceTransport {
    #[default]
    Http,
    Grpc,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server host to bind to
    #[serde(default = "default_host")]
    pub app_host: String,
    /// REST port
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// gRPC port
    #[serde(default = "default_grpc_port")]
    pub grpc_port: u16,
    /// User Service REST base URL
    #[serde(default = "default_user_service_url")]
    pub user_service_url: String,
    /// User Service gRPC endpoint
    #[serde(default = "default_grpc_user_service_url")]
    pub grpc_user_service_url: String,
    #[serde(default)]
    pub user_service_transport: UserServiceTransport,
    /// Existence check timeout in seconds
    #[serde(default = "default_user_service_timeout_secs")]
    pub user_service_timeout_secs: u64,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8002
}

fn default_grpc_port() -> u16 {
    50052
}

fn default_user_service_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_grpc_user_service_url() -> String {
    "http://localhost:50051".to_string()
}

fn default_user_service_timeout_secs() -> u64 {
    5
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.app_host, self.http_port)
    }

    pub fn grpc_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.app_host, self.grpc_port).parse()
    }

    pub fn user_service_timeout(&self) -> Duration {
        Duration::from_secs(self.user_service_timeout_secs)
    }

    /// Existence check client for the configured transport
    pub fn user_directory(&self) -> anyhow::Result<Arc<dyn UserDirectory>> {
        let directory: Arc<dyn UserDirectory> = match self.user_service_transport {
            UserServiceTransport::Http => Arc::new(
                HttpUserDirectory::new(&self.user_service_url, self.user_service_timeout())
                    .context("Invalid USER_SERVICE_URL")?,
            ),
            UserServiceTransport::Grpc => {
                let grpc = GrpcConfig::new(&self.grpc_user_service_url, self.user_service_timeout());
                Arc::new(
                    GrpcUserDirectory::from_config(&grpc)
                        .context("Invalid GRPC_USER_SERVICE_URL")?,
                )
            }
        };
        Ok(directory)
    }
}
