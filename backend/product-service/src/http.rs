//! REST handlers for `/products`

use actix_web::{web, HttpResponse};
use storefront_common::{ProductCreate, Result};

use crate::catalog::ProductCatalog;

pub async fn create_product(
    catalog: web::Data<ProductCatalog>,
    payload: web::Json<ProductCreate>,
) -> Result<HttpResponse> {
    let product = catalog.create(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

pub async fn list_products(catalog: web::Data<ProductCatalog>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(catalog.list().await))
}

pub async fn get_product(
    catalog: web::Data<ProductCatalog>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let product = catalog.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// Register the `/products` routes; expects `web::Data<ProductCatalog>`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::post().to(create_product))
            .route("", web::get().to(list_products))
            .route("/{product_id}", web::get().to(get_product)),
    );
}
