/// gRPC Clients Library
///
/// Generated client stubs for calls between storefront services, endpoint
/// configuration, and the gRPC implementation of the user existence check.
pub mod config;
pub mod user_directory;

pub use config::GrpcConfig;
pub use user_directory::GrpcUserDirectory;

// Re-export generated proto client modules
pub mod storefront {
    pub mod user_service {
        pub mod v1 {
            tonic::include_proto!("storefront.user_service.v1");
        }
        pub use v1::*;
    }
}

pub use storefront::user_service::user_service_client::UserServiceClient;
