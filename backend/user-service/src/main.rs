use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use anyhow::{Context, Result};
use tokio::task::JoinSet;
use tonic::transport::Server;
use tracing::info;

use actix_middleware::{Logging, RequestPipeline};
use request_context::grpc::TrackingLayer;
use storefront_common::{handlers, logging, shutdown, Metrics, UserRepository};
use user_service::grpc::proto::user_service_server::UserServiceServer;
use user_service::{http, Config, UserServiceImpl};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    logging::init("user-service", config.log_format)?;

    info!(
        "Configuration loaded: http_port={}, grpc_port={}",
        config.http_port, config.grpc_port
    );

    // One store and one counter table shared by both transports
    let users = UserRepository::new();
    let metrics = Metrics::new();

    let grpc_addr = config.grpc_addr().context("Invalid gRPC address")?;
    let http_addr = config.http_addr();

    info!("Starting servers:");
    info!("  - HTTP: http://{}", http_addr);
    info!("  - gRPC: grpc://{}", grpc_addr);

    let mut join_set = JoinSet::new();

    let http_users = users.clone();
    let http_metrics = metrics.clone();
    let http_server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(http_users.clone()))
            .app_data(web::Data::new(http_metrics.clone()))
            .app_data(handlers::json_config())
            .wrap(Logging)
            .wrap(NormalizePath::trim())
            .wrap(RequestPipeline::new(http_metrics.clone()))
            .configure(handlers::configure)
            .configure(http::configure)
    })
    .bind(&http_addr)
    .context("Failed to bind HTTP server")?
    .run();

    join_set.spawn(async move {
        http_server
            .await
            .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))
    });

    let grpc_service = UserServiceImpl::new(users);
    let grpc_metrics = metrics.clone();
    join_set.spawn(async move {
        let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
        health_reporter
            .set_serving::<UserServiceServer<UserServiceImpl>>()
            .await;

        Server::builder()
            .layer(TrackingLayer::new(grpc_metrics))
            .add_service(health_service)
            .add_service(grpc_service.into_server())
            .serve_with_shutdown(grpc_addr, shutdown::signal())
            .await
            .map_err(|e| anyhow::anyhow!("gRPC server error: {}", e))
    });

    info!("user-service is running");

    // Stop as soon as either server exits
    if let Some(result) = join_set.join_next().await {
        join_set.abort_all();
        match result {
            Ok(Ok(())) => info!("Server stopped"),
            Ok(Err(e)) => {
                tracing::error!("Server failed: {:#}", e);
                return Err(e);
            }
            Err(e) => {
                tracing::error!("Server task panicked: {:#}", e);
                return Err(anyhow::anyhow!("Server task panicked: {}", e));
            }
        }
    }

    info!("user-service shutting down");
    Ok(())
}
