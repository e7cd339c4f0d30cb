use tonic::{Request, Response, Status};

use storefront_common::{Product, ProductCreate, ServiceError};

use crate::catalog::ProductCatalog;

// Generated protobuf code (from backend/proto/services/product_service.proto)
pub mod proto {
    tonic::include_proto!("storefront.product_service.v1");
}

use proto::product_service_server::{ProductService, ProductServiceServer};
use proto::*;

impl From<Product> for proto::Product {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            user_id: product.user_id.unwrap_or_default(),
        }
    }
}

#[derive(Clone)]
pub struct ProductServiceImpl {
    catalog: ProductCatalog,
}

impl ProductServiceImpl {
    pub fn new(catalog: ProductCatalog) -> Self {
        Self { catalog }
    }

    pub fn into_server(self) -> ProductServiceServer<Self> {
        ProductServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl ProductService for ProductServiceImpl {
    async fn create_product(
        &self,
        request: Request<ProductCreateRequest>,
    ) -> Result<Response<proto::Product>, Status> {
        let req = request.into_inner();
        if req.name.is_empty() {
            return Err(ServiceError::missing_field("name").into());
        }
        let price = req
            .price
            .ok_or_else(|| ServiceError::missing_field("price"))?;
        let product = self
            .catalog
            .create(ProductCreate {
                name: req.name,
                price,
                user_id: Some(req.user_id),
            })
            .await?;

        Ok(Response::new(product.into()))
    }

    async fn get_product(
        &self,
        request: Request<GetProductRequest>,
    ) -> Result<Response<proto::Product>, Status> {
        let req = request.into_inner();
        let product = self.catalog.get(&req.product_id).await?;

        Ok(Response::new(product.into()))
    }

    async fn list_products(
        &self,
        _request: Request<ListProductsRequest>,
    ) -> Result<Response<ListProductsResponse>, Status> {
        let products: Vec<proto::Product> = self
            .catalog
            .list()
            .await
            .into_iter()
            .map(Into::into)
            .collect();
        tracing::info!(count = products.len(), "listed products via gRPC");

        Ok(Response::new(ListProductsResponse { products }))
    }
}
