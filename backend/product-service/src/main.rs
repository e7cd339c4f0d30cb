use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use anyhow::{Context, Result};
use tokio::task::JoinSet;
use tonic::transport::Server;
use tracing::info;

use actix_middleware::{Logging, RequestPipeline};
use product_service::grpc::proto::product_service_server::ProductServiceServer;
use product_service::{http, Config, ProductCatalog, ProductServiceImpl};
use request_context::grpc::TrackingLayer;
use storefront_common::{handlers, logging, shutdown, Metrics, ProductRepository};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    logging::init("product-service", config.log_format)?;

    info!(
        "Configuration loaded: http_port={}, grpc_port={}, user_service_transport={:?}",
        config.http_port, config.grpc_port, config.user_service_transport
    );

    let users = config
        .user_directory()
        .context("Failed to create user directory client")?;
    let catalog = ProductCatalog::new(ProductRepository::new(), users);
    let metrics = Metrics::new();

    let grpc_addr = config.grpc_addr().context("Invalid gRPC address")?;
    let http_addr = config.http_addr();

    info!("Starting servers:");
    info!("  - HTTP: http://{}", http_addr);
    info!("  - gRPC: grpc://{}", grpc_addr);

    let mut join_set = JoinSet::new();

    let http_catalog = catalog.clone();
    let http_metrics = metrics.clone();
    let http_server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(http_catalog.clone()))
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

    let grpc_service = ProductServiceImpl::new(catalog);
    let grpc_metrics = metrics.clone();
    join_set.spawn(async move {
        let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
        health_reporter
            .set_serving::<ProductServiceServer<ProductServiceImpl>>()
            .await;

        Server::builder()
            .layer(TrackingLayer::new(grpc_metrics))
            .add_service(health_service)
            .add_service(grpc_service.into_server())
            .serve_with_shutdown(grpc_addr, shutdown::signal())
            .await
            .map_err(|e| anyhow::anyhow!("gRPC server error: {}", e))
    });

    info!("product-service is running");

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

    info!("product-service shutting down");
    Ok(())
}
