//! Existence check against the User service over gRPC

use async_trait::async_trait;
use request_context::grpc::TrackingInjector;
use storefront_common::UserDirectory;
use tonic::codegen::InterceptedService;
use tonic::transport::Channel;

use crate::config::GrpcConfig;
use crate::storefront::user_service::{user_service_client::UserServiceClient, UserExistsRequest};

type TrackedChannel = InterceptedService<Channel, TrackingInjector>;

/// `UserDirectory` that asks the User service's `UserExists` RPC
#[derive(Clone)]
pub struct GrpcUserDirectory {
    client: UserServiceClient<TrackedChannel>,
}

impl GrpcUserDirectory {
    pub fn new(channel: Channel) -> Self {
        Self {
            client: UserServiceClient::with_interceptor(channel, TrackingInjector),
        }
    }

    /// Lazily connected directory for `config.user_service_url`
    pub fn from_config(config: &GrpcConfig) -> Result<Self, tonic::transport::Error> {
        let channel = config.connect_lazy(&config.user_service_url)?;
        Ok(Self::new(channel))
    }
}

#[async_trait]
impl UserDirectory for GrpcUserDirectory {
    async fn user_exists(&self, user_id: &str) -> bool {
        let mut client = self.client.clone();
        let request = UserExistsRequest {
            user_id: user_id.to_string(),
        };

        match client.user_exists(request).await {
            Ok(response) => response.into_inner().exists,
            Err(status) => {
                tracing::warn!(
                    user_id = %user_id,
                    code = ?status.code(),
                    error = %status.message(),
                    "user existence check over gRPC failed"
                );
                false
            }
        }
    }
}
