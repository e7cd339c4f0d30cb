//! Product operations shared by the REST and gRPC surfaces
//!
//! A product that names an owner is stored only after the configured
//! `UserDirectory` confirms the owner exists. A directory that cannot be
//! reached answers "absent", so an outage of the User service rejects owned
//! products with the same client error as an unknown user.

use std::sync::Arc;

use storefront_common::{
    Product, ProductCreate, ProductRepository, Result, ServiceError, UserDirectory,
};

#[derive(Clone)]
pub struct ProductCatalog {
    products: ProductRepository,
    users: Arc<dyn UserDirectory>,
}

impl ProductCatalog {
    pub fn new(products: ProductRepository, users: Arc<dyn UserDirectory>) -> Self {
        Self { products, users }
    }

    pub fn products(&self) -> &ProductRepository {
        &self.products
    }

    /// Store a product; an empty `user_id` means no owner on every transport
    pub async fn create(&self, mut payload: ProductCreate) -> Result<Product> {
        payload.user_id = payload.user_id.filter(|id| !id.is_empty());

        if let Some(user_id) = payload.user_id.as_deref() {
            if !self.users.user_exists(user_id).await {
                tracing::warn!(user_id = %user_id, "rejected product for unknown user");
                return Err(ServiceError::InvalidRequest(format!(
                    "user {} does not exist",
                    user_id
                )));
            }
        }

        Ok(self.products.create(payload).await)
    }

    pub async fn get(&self, product_id: &str) -> Result<Product> {
        self.products
            .get(product_id)
            .await
            .ok_or_else(|| ServiceError::NotFound("Product".to_string()))
    }

    pub async fn list(&self) -> Vec<Product> {
        self.products.list_all().await
    }
}
