//! REST handlers for `/users`

use actix_web::{web, HttpResponse};
use storefront_common::{Result, ServiceError, UserCreate, UserRepository};

pub async fn create_user(
    users: web::Data<UserRepository>,
    payload: web::Json<UserCreate>,
) -> Result<HttpResponse> {
    let user = users.create(payload.into_inner()).await;
    Ok(HttpResponse::Ok().json(user))
}

pub async fn list_users(users: web::Data<UserRepository>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(users.list_all().await))
}

pub async fn get_user(
    users: web::Data<UserRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    let user = users
        .get(&user_id)
        .await
        .ok_or_else(|| ServiceError::NotFound("User".to_string()))?;
    Ok(HttpResponse::Ok().json(user))
}

/// Register the `/users` routes; expects `web::Data<UserRepository>`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::post().to(create_user))
            .route("", web::get().to(list_users))
            .route("/{user_id}", web::get().to(get_user)),
    );
}
