//! Backend seam used by the catalog pipeline.

use async_trait::async_trait;
use storefront_api::{
    ApiError, PRODUCT_CATEGORY_COLLECTION, PRODUCT_COLLECTION, Product, ProductCategory,
    ProductId, SUPPLIER_COLLECTION, StorefrontClient, Supplier,
};

/// The REST operations the catalog consumes.
///
/// Implemented by [`StorefrontClient`]; tests substitute in-memory fakes.
#[async_trait]
pub trait StorefrontBackend: Send + Sync {
    /// `GET /products`
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;

    /// `GET /productCategories`
    async fn list_categories(&self) -> Result<Vec<ProductCategory>, ApiError>;

    /// `GET /suppliers`
    async fn list_suppliers(&self) -> Result<Vec<Supplier>, ApiError>;

    /// `POST /products`, returning the created product with its new id.
    async fn create_product(&self, product: &Product) -> Result<Product, ApiError>;

    /// `PUT /products/{id}`
    async fn replace_product(&self, id: ProductId, product: &Product) -> Result<(), ApiError>;

    /// `DELETE /products/{id}`
    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError>;
}

#[async_trait]
impl StorefrontBackend for StorefrontClient {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.list(PRODUCT_COLLECTION).await
    }

    async fn list_categories(&self) -> Result<Vec<ProductCategory>, ApiError> {
        self.list(PRODUCT_CATEGORY_COLLECTION).await
    }

    async fn list_suppliers(&self) -> Result<Vec<Supplier>, ApiError> {
        self.list(SUPPLIER_COLLECTION).await
    }

    async fn create_product(&self, product: &Product) -> Result<Product, ApiError> {
        self.create(PRODUCT_COLLECTION, product).await
    }

    async fn replace_product(&self, id: ProductId, product: &Product) -> Result<(), ApiError> {
        self.replace(PRODUCT_COLLECTION, id, product).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        self.delete(PRODUCT_COLLECTION, id).await
    }
}
