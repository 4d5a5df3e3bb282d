use crate::farm::Farm;
use crate::market::MarketPriceIndex;
use crate::product::{PriceHistory, Product, ProductCategory};
use async_trait::async_trait;
use uuid::Uuid;

/// Repository trait for farm data access
#[async_trait]
pub trait FarmRepository: Send + Sync {
    async fn create_farm(
        &self,
        farm: &Farm,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_farm(
        &self,
        id: Uuid,
    ) -> Result<Option<Farm>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_active_farms(
        &self,
    ) -> Result<Vec<Farm>, Box<dyn std::error::Error + Send + Sync>>;

    async fn deactivate_farm(
        &self,
        id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for product catalog access
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create_product(
        &self,
        product: &Product,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_product(
        &self,
        id: Uuid,
    ) -> Result<Option<Product>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_available_products(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<Product>, Box<dyn std::error::Error + Send + Sync>>;

    async fn update_product(
        &self,
        product: &Product,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn get_category(
        &self,
        id: Uuid,
    ) -> Result<Option<ProductCategory>, Box<dyn std::error::Error + Send + Sync>>;

    async fn add_price_history(
        &self,
        entry: &PriceHistory,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn list_market_prices(
        &self,
        product_name: Option<&str>,
    ) -> Result<Vec<MarketPriceIndex>, Box<dyn std::error::Error + Send + Sync>>;
}
