use serde_json::{json, Value};

use super::client::segment;
use super::{ApiClient, ApiError};
use crate::models::{Product, ProductInput};

impl ApiClient {
    /// Products currently for sale.
    pub async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get("/products").await
    }

    pub async fn fetch_all_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get("/products/all").await
    }

    pub async fn fetch_product(&self, id: &str) -> Result<Product, ApiError> {
        self.get(&format!("/products/{}", segment(id))).await
    }

    pub async fn fetch_product_by_slug(&self, slug: &str) -> Result<Product, ApiError> {
        self.get(&format!("/products/slug/{}", segment(slug))).await
    }

    pub async fn fetch_products_by_category(&self, category: &str) -> Result<Vec<Product>, ApiError> {
        self.get(&format!("/products/category/{}", segment(category))).await
    }

    pub async fn fetch_product_categories(&self) -> Result<Vec<String>, ApiError> {
        self.get("/products/categories").await
    }

    pub async fn create_product(&self, product: &ProductInput) -> Result<Product, ApiError> {
        self.post("/products", product).await
    }

    pub async fn update_product(&self, id: &str, product: &ProductInput) -> Result<Product, ApiError> {
        self.patch(&format!("/products/{}", segment(id)), product).await
    }

    pub async fn delete_product(&self, id: &str) -> Result<(), ApiError> {
        let _: Value = self.delete(&format!("/products/{}", segment(id))).await?;
        Ok(())
    }

    pub async fn toggle_product_availability(&self, id: &str) -> Result<Product, ApiError> {
        self.post(&format!("/products/{}/toggle-availability", segment(id)), &json!({}))
            .await
    }
}
