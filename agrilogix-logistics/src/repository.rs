use crate::models::{LogisticsRoute, Shipment, TrackingPoint, Vehicle};
use async_trait::async_trait;
use uuid::Uuid;

/// Repository trait for shipment data access
#[async_trait]
pub trait ShipmentRepository: Send + Sync {
    async fn create_shipment(
        &self,
        shipment: &Shipment,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_shipment(
        &self,
        id: Uuid,
    ) -> Result<Option<Shipment>, Box<dyn std::error::Error + Send + Sync>>;

    async fn update_shipment(
        &self,
        shipment: &Shipment,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn list_shipments_for_driver(
        &self,
        driver_id: Uuid,
    ) -> Result<Vec<Shipment>, Box<dyn std::error::Error + Send + Sync>>;

    async fn add_tracking_point(
        &self,
        point: &TrackingPoint,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn latest_tracking_point(
        &self,
        shipment_id: Uuid,
    ) -> Result<Option<TrackingPoint>, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_vehicle(
        &self,
        id: Uuid,
    ) -> Result<Option<Vehicle>, Box<dyn std::error::Error + Send + Sync>>;

    async fn create_vehicle(
        &self,
        vehicle: &Vehicle,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;

    async fn update_vehicle_position(
        &self,
        id: Uuid,
        latitude: rust_decimal::Decimal,
        longitude: rust_decimal::Decimal,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Count of delivered shipments and the total weight they moved.
    async fn delivered_stats(
        &self,
    ) -> Result<(u64, rust_decimal::Decimal), Box<dyn std::error::Error + Send + Sync>>;

    async fn list_active_routes(
        &self,
        cold_chain_only: bool,
    ) -> Result<Vec<LogisticsRoute>, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_route(
        &self,
        id: Uuid,
    ) -> Result<Option<LogisticsRoute>, Box<dyn std::error::Error + Send + Sync>>;
}
