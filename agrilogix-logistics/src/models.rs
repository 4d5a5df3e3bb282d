use agrilogix_core::money::round_money;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Motorcycle,
    Pickup,
    TruckSmall,
    TruckMedium,
    TruckLarge,
    Refrigerated,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    InTransit,
    Maintenance,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub vehicle_type: VehicleType,
    pub plate_number: String,
    pub make_model: String,
    pub year: u32,
    pub capacity_kg: Decimal,
    pub is_refrigerated: bool,
    pub refrigeration_min_temp: Option<i32>,
    pub refrigeration_max_temp: Option<i32>,
    pub insurance_expiry: NaiveDate,
    pub inspection_expiry: NaiveDate,
    pub status: VehicleStatus,
    pub current_latitude: Option<Decimal>,
    pub current_longitude: Option<Decimal>,
    pub last_location_update: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A recurring haulage corridor with its per-kg rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticsRoute {
    pub id: Uuid,
    pub name: String,
    pub origin_name: String,
    pub destination_name: String,
    pub distance_km: Decimal,
    pub estimated_duration_hours: Decimal,
    pub base_cost_per_kg: Decimal,
    pub is_cold_chain_available: bool,
    pub is_active: bool,
}

impl LogisticsRoute {
    /// Freight quote for a load on this route.
    pub fn quote(&self, weight_kg: Decimal) -> Decimal {
        round_money(self.base_cost_per_kg * weight_kg)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    Pending,
    Assigned,
    PickedUp,
    InTransit,
    AtColdStorage,
    OutForDelivery,
    Delivered,
    Failed,
}

impl ShipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "pending",
            ShipmentStatus::Assigned => "assigned",
            ShipmentStatus::PickedUp => "picked_up",
            ShipmentStatus::InTransit => "in_transit",
            ShipmentStatus::AtColdStorage => "at_cold_storage",
            ShipmentStatus::OutForDelivery => "out_for_delivery",
            ShipmentStatus::Delivered => "delivered",
            ShipmentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ShipmentStatus::Pending),
            "assigned" => Ok(ShipmentStatus::Assigned),
            "picked_up" => Ok(ShipmentStatus::PickedUp),
            "in_transit" => Ok(ShipmentStatus::InTransit),
            "at_cold_storage" => Ok(ShipmentStatus::AtColdStorage),
            "out_for_delivery" => Ok(ShipmentStatus::OutForDelivery),
            "delivered" => Ok(ShipmentStatus::Delivered),
            "failed" => Ok(ShipmentStatus::Failed),
            other => Err(format!("Unknown shipment status: {}", other)),
        }
    }
}

/// A physical movement of produce for an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    pub id: Uuid,
    pub shipment_code: String,
    pub order_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub route_id: Option<Uuid>,
    pub pickup_address: String,
    pub delivery_address: String,
    pub status: ShipmentStatus,
    pub scheduled_pickup: DateTime<Utc>,
    pub actual_pickup: Option<DateTime<Utc>>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub actual_delivery: Option<DateTime<Utc>>,
    pub shipping_cost: Decimal,
    pub weight_kg: Decimal,
    pub requires_cold_chain: bool,
    pub notes: Option<String>,
    pub driver_rating: Option<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shipment {
    pub fn new(
        order_id: Uuid,
        pickup_address: String,
        delivery_address: String,
        scheduled_pickup: DateTime<Utc>,
        weight_kg: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            shipment_code: Self::generate_code(),
            order_id,
            driver_id: None,
            vehicle_id: None,
            route_id: None,
            pickup_address,
            delivery_address,
            status: ShipmentStatus::Pending,
            scheduled_pickup,
            actual_pickup: None,
            estimated_delivery: None,
            actual_delivery: None,
            shipping_cost: Decimal::ZERO,
            weight_kg,
            requires_cold_chain: false,
            notes: None,
            driver_rating: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Shipment codes look like SHP-4C19E0F2.
    fn generate_code() -> String {
        let tail = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
        format!("SHP-{}", tail)
    }
}

/// One GPS observation along a shipment's journey.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingPoint {
    pub id: Uuid,
    pub shipment_id: Uuid,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub speed_kmh: Decimal,
    pub status_note: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn route_quote_is_rate_times_weight() {
        let route = LogisticsRoute {
            id: Uuid::new_v4(),
            name: "Nakuru - Nairobi".to_string(),
            origin_name: "Nakuru Town".to_string(),
            destination_name: "Wakulima Market, Nairobi".to_string(),
            distance_km: dec!(158),
            estimated_duration_hours: dec!(3.5),
            base_cost_per_kg: dec!(7.0000),
            is_cold_chain_available: true,
            is_active: true,
        };
        assert_eq!(route.quote(dec!(500)), dec!(3500.00));
    }

    #[test]
    fn shipment_code_format() {
        let shipment = Shipment::new(
            Uuid::new_v4(),
            "Kamau Mixed Farm, Nakuru".to_string(),
            "Two Rivers Mall, Nairobi".to_string(),
            Utc::now(),
            dec!(500),
        );
        assert!(shipment.shipment_code.starts_with("SHP-"));
        assert_eq!(shipment.shipment_code.len(), 12);
    }
}
