//! Product service talking to a live User service

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use actix_middleware::RequestPipeline;
use actix_web::middleware::NormalizePath;
use actix_web::{test, web, App, HttpRequest, HttpResponse, HttpServer};
use grpc_clients::{GrpcConfig, GrpcUserDirectory};
use product_service::clients::HttpUserDirectory;
use product_service::{http, ProductCatalog};
use request_context::grpc::TrackingLayer;
use serde_json::json;
use storefront_common::{
    handlers, Metrics, Product, ProductRepository, User, UserDirectory, UserRepository,
};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use user_service::UserServiceImpl;

/// Start the User service REST surface on an ephemeral port
fn spawn_user_rest(users: UserRepository) -> String {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(users.clone()))
            .app_data(handlers::json_config())
            .wrap(NormalizePath::trim())
            .configure(user_service::http::configure)
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}", addr)
}

/// Start the User service gRPC surface on an ephemeral port
async fn spawn_user_grpc(users: UserRepository) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    actix_web::rt::spawn(async move {
        Server::builder()
            .layer(TrackingLayer::new(Metrics::new()))
            .add_service(UserServiceImpl::new(users).into_server())
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });
    addr
}

macro_rules! product_app {
    ($directory:expr) => {{
        let metrics = Metrics::new();
        let catalog = ProductCatalog::new(ProductRepository::new(), $directory);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(catalog.clone()))
                .app_data(handlers::json_config())
                .wrap(RequestPipeline::new(metrics))
                .configure(http::configure),
        )
        .await;
        (app, catalog)
    }};
}

async fn create_user(base: &str, name: &str) -> User {
    reqwest::Client::new()
        .post(format!("{}/users", base))
        .json(&json!({ "name": name, "email": format!("{}@example.com", name.to_lowercase()) }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[actix_web::test]
async fn test_product_owner_validated_over_rest() {
    let users = UserRepository::new();
    let base = spawn_user_rest(users.clone());

    let user = create_user(&base, "Alice").await;
    assert!(user.id.starts_with("u_"));

    let directory: Arc<dyn UserDirectory> =
        Arc::new(HttpUserDirectory::new(&base, Duration::from_secs(5)).unwrap());
    let (app, catalog) = product_app!(directory);

    let req = test::TestRequest::post()
        .uri("/products")
        .set_json(json!({ "name": "Laptop", "price": 999.99, "user_id": &user.id }))
        .to_request();
    let product: Product = test::call_and_read_body_json(&app, req).await;
    assert_eq!(product.user_id.as_deref(), Some(user.id.as_str()));

    let req = test::TestRequest::post()
        .uri("/products")
        .set_json(json!({ "name": "Ghost", "price": 1.0, "user_id": "u_ghost" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    assert_eq!(catalog.products().len(), 1);

    // The owner is still retrievable from the User service
    let resp = reqwest::get(format!("{}/users/{}", base, user.id)).await.unwrap();
    assert!(resp.status().is_success());
}

#[actix_web::test]
async fn test_product_owner_validated_over_grpc() {
    let users = UserRepository::new();
    let base = spawn_user_rest(users.clone());
    let user = create_user(&base, "Bob").await;
    let addr = spawn_user_grpc(users).await;

    let config = GrpcConfig::new(format!("http://{}", addr), Duration::from_secs(5));
    let directory: Arc<dyn UserDirectory> =
        Arc::new(GrpcUserDirectory::from_config(&config).unwrap());
    let (app, catalog) = product_app!(directory);

    let req = test::TestRequest::post()
        .uri("/products")
        .set_json(json!({ "name": "Tablet", "price": 399.99, "user_id": &user.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let req = test::TestRequest::post()
        .uri("/products")
        .set_json(json!({ "name": "Ghost", "price": 1.0, "user_id": "u_ghost" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    assert_eq!(catalog.products().len(), 1);
}

/// Authority that only acknowledges lookups carrying a tracking value
async fn tracked_lookup(req: HttpRequest) -> HttpResponse {
    let tracked = req
        .headers()
        .get("x-tracking-id")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("req_"));
    if tracked {
        HttpResponse::Ok().json(json!({ "id": "u_tracked", "name": "T", "email": "t@example.com" }))
    } else {
        HttpResponse::NotFound().finish()
    }
}

#[actix_web::test]
async fn test_rest_lookup_forwards_tracking_value() {
    let server = HttpServer::new(|| App::new().route("/users/{id}", web::get().to(tracked_lookup)))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
    let base = format!("http://{}", server.addrs()[0]);
    actix_web::rt::spawn(server.run());

    let directory = HttpUserDirectory::new(&base, Duration::from_secs(5)).unwrap();

    // Outside a request there is nothing to forward
    assert!(!directory.user_exists("u_tracked").await);

    let directory: Arc<dyn UserDirectory> = Arc::new(directory);
    let (app, _catalog) = product_app!(directory);
    let req = test::TestRequest::post()
        .uri("/products")
        .set_json(json!({ "name": "Mug", "price": 12.0, "user_id": "u_tracked" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
}

#[actix_web::test]
async fn test_dot_and_empty_owner_ids_never_match_over_rest() {
    let users = UserRepository::new();
    let base = spawn_user_rest(users.clone());
    create_user(&base, "Carol").await;

    let rest = HttpUserDirectory::new(&base, Duration::from_secs(5)).unwrap();
    for id in ["", ".", ".."] {
        assert!(!rest.user_exists(id).await, "id {:?}", id);
    }

    let directory: Arc<dyn UserDirectory> = Arc::new(rest);
    let (app, catalog) = product_app!(directory);

    for id in [".", ".."] {
        let req = test::TestRequest::post()
            .uri("/products")
            .set_json(json!({ "name": "X", "price": 1.0, "user_id": id }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400, "id {:?}", id);
    }
    assert!(catalog.products().is_empty());

    // An empty owner is no owner, as over gRPC
    let req = test::TestRequest::post()
        .uri("/products")
        .set_json(json!({ "name": "X", "price": 1.0, "user_id": "" }))
        .to_request();
    let product: Product = test::call_and_read_body_json(&app, req).await;
    assert_eq!(product.user_id, None);
}

/// Authority answering every lookup with the same record
async fn fixed_user(_req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "id": "u_someone", "name": "S", "email": "s@example.com" }))
}

#[actix_web::test]
async fn test_rest_lookup_requires_the_requested_record() {
    let server = HttpServer::new(|| App::new().route("/users/{id}", web::get().to(fixed_user)))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
    let base = format!("http://{}", server.addrs()[0]);
    actix_web::rt::spawn(server.run());

    let directory = HttpUserDirectory::new(&base, Duration::from_secs(5)).unwrap();
    assert!(directory.user_exists("u_someone").await);
    assert!(!directory.user_exists("u_other").await);
}
