use std::sync::Arc;
use std::time::Duration;

use actix_middleware::{Logging, RequestPipeline};
use actix_web::{middleware::NormalizePath, test, web, App};
use product_service::clients::HttpUserDirectory;
use product_service::{http, ProductCatalog};
use serde_json::{json, Value};
use storefront_common::directory::LocalUserDirectory;
use storefront_common::{
    handlers, Metrics, Product, ProductRepository, UserCreate, UserDirectory, UserRepository,
};

macro_rules! app {
    ($catalog:expr, $metrics:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($catalog.clone()))
                .app_data(web::Data::new($metrics.clone()))
                .app_data(handlers::json_config())
                .wrap(Logging)
                .wrap(NormalizePath::trim())
                .wrap(RequestPipeline::new($metrics.clone()))
                .configure(handlers::configure)
                .configure(http::configure),
        )
        .await
    };
}

/// Catalog whose owners are checked against an in-process user store
fn catalog_with_users(users: &UserRepository) -> ProductCatalog {
    let directory: Arc<dyn UserDirectory> = Arc::new(LocalUserDirectory::new(users.clone()));
    ProductCatalog::new(ProductRepository::new(), directory)
}

#[actix_web::test]
async fn test_create_get_and_list_products() {
    let catalog = catalog_with_users(&UserRepository::new());
    let metrics = Metrics::new();
    let app = app!(catalog, metrics);

    let mut created = Vec::new();
    for (name, price) in [("Phone", 499.99), ("Tablet", 399.99)] {
        let req = test::TestRequest::post()
            .uri("/products/")
            .set_json(json!({ "name": name, "price": price }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200);
        let product: Product = test::read_body_json(resp).await;
        assert!(product.id.starts_with("p_"));
        assert_eq!(product.user_id, None);
        created.push(product);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/products/{}", created[0].id))
        .to_request();
    let fetched: Product = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created[0]);

    let req = test::TestRequest::get().uri("/products").to_request();
    let listed: Vec<Product> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.len(), 2);
}

#[actix_web::test]
async fn test_product_json_omits_missing_owner() {
    let catalog = catalog_with_users(&UserRepository::new());
    let metrics = Metrics::new();
    let app = app!(catalog, metrics);

    let req = test::TestRequest::post()
        .uri("/products")
        .set_json(json!({ "name": "Cable", "price": 9.5, "user_id": null }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["name"], "Cable");
    assert!(body.get("user_id").is_none());
}

#[actix_web::test]
async fn test_empty_owner_is_treated_as_no_owner() {
    let catalog = catalog_with_users(&UserRepository::new());
    let metrics = Metrics::new();
    let app = app!(catalog, metrics);

    let req = test::TestRequest::post()
        .uri("/products")
        .set_json(json!({ "name": "Cable", "price": 9.5, "user_id": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert!(body.get("user_id").is_none());
    assert_eq!(catalog.products().len(), 1);
}

#[actix_web::test]
async fn test_create_product_missing_fields_returns_422() {
    let catalog = catalog_with_users(&UserRepository::new());
    let metrics = Metrics::new();
    let app = app!(catalog, metrics);

    for payload in [
        json!({ "name": "NoPrice" }),
        json!({ "price": 9.99 }),
        json!({ "name": "Typo", "price": "cheap" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/products/")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 422);
    }

    assert!(catalog.products().is_empty());
}

#[actix_web::test]
async fn test_get_nonexistent_product_returns_404() {
    let catalog = catalog_with_users(&UserRepository::new());
    let metrics = Metrics::new();
    let app = app!(catalog, metrics);

    let req = test::TestRequest::get()
        .uri("/products/nonexistent-id")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
    assert!(resp.headers().contains_key("x-tracking-id"));
}

#[actix_web::test]
async fn test_owner_must_exist() {
    let users = UserRepository::new();
    let catalog = catalog_with_users(&users);
    let metrics = Metrics::new();
    let app = app!(catalog, metrics);

    let alice = users
        .create(UserCreate {
            name: "Alice".into(),
            email: "alice@example.com".into(),
        })
        .await;

    let req = test::TestRequest::post()
        .uri("/products/")
        .set_json(json!({ "name": "Laptop", "price": 999.99, "user_id": &alice.id }))
        .to_request();
    let product: Product = test::call_and_read_body_json(&app, req).await;
    assert_eq!(product.user_id.as_deref(), Some(alice.id.as_str()));

    let req = test::TestRequest::post()
        .uri("/products/")
        .set_json(json!({ "name": "Ghost", "price": 1.0, "user_id": "u_ghost" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 400);

    assert_eq!(catalog.products().len(), 1);
}

#[actix_web::test]
async fn test_unreachable_user_service_rejects_owned_products() {
    // Nothing listens on port 1
    let directory: Arc<dyn UserDirectory> = Arc::new(
        HttpUserDirectory::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap(),
    );
    let catalog = ProductCatalog::new(ProductRepository::new(), directory);
    let metrics = Metrics::new();
    let app = app!(catalog, metrics);

    let req = test::TestRequest::post()
        .uri("/products/")
        .set_json(json!({ "name": "Laptop", "price": 999.99, "user_id": "u_alice" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    assert!(catalog.products().is_empty());

    // Ownerless products never consult the User service
    let req = test::TestRequest::post()
        .uri("/products/")
        .set_json(json!({ "name": "Phone", "price": 499.99 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
}

#[actix_web::test]
async fn test_health_and_metrics() {
    let catalog = catalog_with_users(&UserRepository::new());
    let metrics = Metrics::new();
    let app = app!(catalog, metrics);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");

    for _ in 0..2 {
        let req = test::TestRequest::get().uri("/products/").to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["counters"]["requests_total"], 4);
    assert!(body["uptime_seconds"].as_f64().is_some());
}
