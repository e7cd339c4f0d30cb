use actix_web::{middleware::NormalizePath, App, HttpServer};
use anyhow::{Context, Result};
use tokio::task::JoinSet;
use tonic::transport::Server;
use tracing::info;

use actix_middleware::{Logging, RequestPipeline};
use monolith::{Config, Monolith};
use product_service::grpc::proto::product_service_server::ProductServiceServer;
use product_service::ProductServiceImpl;
use request_context::grpc::TrackingLayer;
use storefront_common::{logging, shutdown};
use user_service::grpc::proto::user_service_server::UserServiceServer;
use user_service::UserServiceImpl;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    logging::init("monolith", config.log_format)?;

    info!(
        "Configuration loaded: http_port={}, grpc_port={}",
        config.http_port, config.grpc_port
    );

    let monolith = Monolith::new();

    let grpc_addr = config.grpc_addr().context("Invalid gRPC address")?;
    let http_addr = config.http_addr();

    info!("Starting servers:");
    info!("  - HTTP: http://{}", http_addr);
    info!("  - gRPC: grpc://{}", grpc_addr);

    let mut join_set = JoinSet::new();

    let http_monolith = monolith.clone();
    let http_server = HttpServer::new(move || {
        let monolith = http_monolith.clone();
        App::new()
            .wrap(Logging)
            .wrap(NormalizePath::trim())
            .wrap(RequestPipeline::new(monolith.metrics.clone()))
            .configure(|cfg| monolith.configure(cfg))
    })
    .bind(&http_addr)
    .context("Failed to bind HTTP server")?
    .run();

    join_set.spawn(async move {
        http_server
            .await
            .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))
    });

    join_set.spawn(async move {
        let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
        health_reporter
            .set_serving::<UserServiceServer<UserServiceImpl>>()
            .await;
        health_reporter
            .set_serving::<ProductServiceServer<ProductServiceImpl>>()
            .await;

        Server::builder()
            .layer(TrackingLayer::new(monolith.metrics.clone()))
            .add_service(health_service)
            .add_service(monolith.user_grpc())
            .add_service(monolith.product_grpc())
            .serve_with_shutdown(grpc_addr, shutdown::signal())
            .await
            .map_err(|e| anyhow::anyhow!("gRPC server error: {}", e))
    });

    info!("monolith is running");

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

    info!("monolith shutting down");
    Ok(())
}
