/// Configuration management for the monolith
use serde::Deserialize;
use std::net::SocketAddr;
use storefront_common::logging::LogFormat;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server host to bind to
    #[serde(default = "default_host")]
    pub app_host: String,
    /// REST port
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// gRPC port serving both domains
    #[serde(default = "default_grpc_port")]
    pub grpc_port: u16,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8000
}

fn default_grpc_port() -> u16 {
    50050
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
}
