use crate::metrics::Metrics;
use agrilogix_catalog::repository::{FarmRepository, ProductRepository};
use agrilogix_coldchain::repository::ColdChainRepository;
use agrilogix_logistics::repository::ShipmentRepository;
use agrilogix_order::repository::OrderRepository;
use agrilogix_store::{app_config::BusinessRules, Notifier, RedisClient};
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub redis: Arc<RedisClient>,
    pub notifier: Arc<Notifier>,
    pub farm_repo: Arc<dyn FarmRepository>,
    pub product_repo: Arc<dyn ProductRepository>,
    pub order_repo: Arc<dyn OrderRepository>,
    pub shipment_repo: Arc<dyn ShipmentRepository>,
    pub coldchain_repo: Arc<dyn ColdChainRepository>,
    pub business_rules: BusinessRules,
    pub auth: AuthConfig,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Whether produce in the given category must ride the cold chain.
    pub async fn coldchain_required(
        &self,
        category_id: uuid::Uuid,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .product_repo
            .get_category(category_id)
            .await?
            .map(|c| c.requires_cold_chain)
            .unwrap_or(false))
    }
}
