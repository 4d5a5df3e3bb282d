use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct OrderPlacedEvent {
    pub order_id: Uuid,
    pub order_number: String,
    pub buyer_id: Uuid,
    pub farmer_id: Uuid,
    pub total_amount: Decimal,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct OrderStatusChangedEvent {
    pub order_id: Uuid,
    pub order_number: String,
    pub from_status: String,
    pub to_status: String,
    pub changed_by: Uuid,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ShipmentStatusChangedEvent {
    pub shipment_id: Uuid,
    pub shipment_code: String,
    pub from_status: String,
    pub to_status: String,
    pub driver_id: Option<Uuid>,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookingCreatedEvent {
    pub booking_id: Uuid,
    pub facility_id: Uuid,
    pub booked_by: Uuid,
    pub quantity_tonnes: Decimal,
    pub total_cost: Decimal,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct TemperatureAlertEvent {
    pub booking_id: Option<Uuid>,
    pub shipment_id: Option<Uuid>,
    pub sensor_id: String,
    pub temperature_celsius: Decimal,
    pub alert_level: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct DisputeRaisedEvent {
    pub dispute_id: Uuid,
    pub order_id: Uuid,
    pub raised_by: Uuid,
    pub reason: String,
    pub timestamp: i64,
}
