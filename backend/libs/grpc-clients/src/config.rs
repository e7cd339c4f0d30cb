/// gRPC client configuration
///
/// Endpoint settings for calls into other storefront services. Channels are
/// created lazily: a caller can start while its dependency is still down,
/// and each call fails on its own until the dependency comes up.
use serde::{Deserialize, Serialize};
use std::time::Duration;

use tonic::transport::{Channel, Endpoint};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GrpcConfig {
    /// User Service endpoint
    pub user_service_url: String,

    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for GrpcConfig {
    fn default() -> Self {
        Self {
            user_service_url: "http://localhost:50051".to_string(),
            connection_timeout_secs: 5,
            request_timeout_secs: 5,
        }
    }
}

impl GrpcConfig {
    pub fn new(user_service_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            user_service_url: user_service_url.into(),
            connection_timeout_secs: timeout.as_secs().max(1),
            request_timeout_secs: timeout.as_secs().max(1),
        }
    }

    /// Build a tonic Endpoint from URL with this configuration's timeouts
    pub fn make_endpoint(&self, url: &str) -> Result<Endpoint, tonic::transport::Error> {
        Ok(Endpoint::from_shared(url.to_string())?
            .connect_timeout(Duration::from_secs(self.connection_timeout_secs))
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .tcp_nodelay(true))
    }

    /// Channel that connects on first use
    pub fn connect_lazy(&self, url: &str) -> Result<Channel, tonic::transport::Error> {
        Ok(self.make_endpoint(url)?.connect_lazy())
    }
}
