use crate::changes::OrderChange;
use crate::disputes::{Dispute, DisputeStatus};
use crate::models::{Order, OrderItem, OrderStatus};
use async_trait::async_trait;
use uuid::Uuid;

/// Repository trait for order data access
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create_order(
        &self,
        order: &Order,
        items: &[OrderItem],
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_order(
        &self,
        id: Uuid,
    ) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_order_items(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<OrderItem>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_orders_for_party(
        &self,
        party_id: Uuid,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_all_orders(
        &self,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>>;

    async fn update_order(
        &self,
        order: &Order,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn add_order_change(
        &self,
        change: &OrderChange,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn create_dispute(
        &self,
        dispute: &Dispute,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_dispute(
        &self,
        id: Uuid,
    ) -> Result<Option<Dispute>, Box<dyn std::error::Error + Send + Sync>>;

    async fn update_dispute(
        &self,
        dispute: &Dispute,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn list_disputes(
        &self,
        status: Option<DisputeStatus>,
    ) -> Result<Vec<Dispute>, Box<dyn std::error::Error + Send + Sync>>;
}
