use crate::models::{ColdStorageBooking, ColdStorageFacility, TemperatureLog};
use async_trait::async_trait;
use uuid::Uuid;

/// Repository trait for cold-chain data access
#[async_trait]
pub trait ColdChainRepository: Send + Sync {
    async fn create_facility(
        &self,
        facility: &ColdStorageFacility,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_facility(
        &self,
        id: Uuid,
    ) -> Result<Option<ColdStorageFacility>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_operational_facilities(
        &self,
    ) -> Result<Vec<ColdStorageFacility>, Box<dyn std::error::Error + Send + Sync>>;

    async fn update_facility(
        &self,
        facility: &ColdStorageFacility,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn create_booking(
        &self,
        booking: &ColdStorageBooking,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_booking(
        &self,
        id: Uuid,
    ) -> Result<Option<ColdStorageBooking>, Box<dyn std::error::Error + Send + Sync>>;

    async fn update_booking(
        &self,
        booking: &ColdStorageBooking,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn add_temperature_log(
        &self,
        log: &TemperatureLog,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn latest_temperature_log(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<TemperatureLog>, Box<dyn std::error::Error + Send + Sync>>;

    async fn count_alerts(&self) -> Result<u64, Box<dyn std::error::Error + Send + Sync>>;
}
