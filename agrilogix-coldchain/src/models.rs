use agrilogix_core::money::{percent_of, round_money};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FacilityStatus {
    Operational,
    Full,
    Maintenance,
    Offline,
}

/// A temperature-controlled warehouse.
///
/// `available_capacity_tonnes` is maintained by the booking desk: confirmed
/// bookings debit it, completed or cancelled ones credit it back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColdStorageFacility {
    pub id: Uuid,
    pub operator_id: Uuid,
    pub name: String,
    pub location_name: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub total_capacity_tonnes: Decimal,
    pub available_capacity_tonnes: Decimal,
    pub min_temperature_celsius: i32,
    pub max_temperature_celsius: i32,
    pub cost_per_tonne_per_day: Decimal,
    pub has_backup_generator: bool,
    pub certification: Option<String>,
    pub status: FacilityStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl ColdStorageFacility {
    /// Share of capacity in use, one decimal place, 0 for an empty-capacity
    /// facility.
    pub fn utilization_percent(&self) -> Decimal {
        percent_of(
            self.total_capacity_tonnes - self.available_capacity_tonnes,
            self.total_capacity_tonnes,
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Active => "active",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Confirmed and active bookings hold facility capacity.
    pub fn holds_capacity(&self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::Active)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reservation of cold-storage capacity over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColdStorageBooking {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub order_id: Option<Uuid>,
    pub booked_by: Uuid,
    pub product_description: String,
    pub quantity_tonnes: Decimal,
    pub required_temp_min: i32,
    pub required_temp_max: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_cost: Decimal,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ColdStorageBooking {
    /// Calendar days between start and end. Cost calculations floor this at 1;
    /// see the booking desk.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Days billed for this booking: at least one, even for same-day stays.
    pub fn billable_days(&self) -> i64 {
        self.duration_days().max(1)
    }

    pub fn cost_at_rate(&self, rate_per_tonne_per_day: Decimal) -> Decimal {
        round_money(
            self.quantity_tonnes * rate_per_tonne_per_day * Decimal::from(self.billable_days()),
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Normal,
    Warning,
    Critical,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Normal => "normal",
            AlertLevel::Warning => "warning",
            AlertLevel::Critical => "critical",
        }
    }
}

/// One sensor reading inside a facility or a refrigerated vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureLog {
    pub id: Uuid,
    pub booking_id: Option<Uuid>,
    pub shipment_id: Option<Uuid>,
    pub sensor_id: String,
    pub temperature_celsius: Decimal,
    pub humidity_percent: Option<Decimal>,
    pub alert_level: AlertLevel,
    pub is_alert_sent: bool,
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn facility(total: Decimal, available: Decimal) -> ColdStorageFacility {
        ColdStorageFacility {
            id: Uuid::new_v4(),
            operator_id: Uuid::new_v4(),
            name: "Arctic Cold Kenya - Nairobi Hub".to_string(),
            location_name: "Industrial Area, Nairobi".to_string(),
            latitude: dec!(-1.3031),
            longitude: dec!(36.8516),
            total_capacity_tonnes: total,
            available_capacity_tonnes: available,
            min_temperature_celsius: -2,
            max_temperature_celsius: 8,
            cost_per_tonne_per_day: dec!(850.00),
            has_backup_generator: true,
            certification: Some("KEBS Certified Cold Chain".to_string()),
            status: FacilityStatus::Operational,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn utilization_rounds_to_one_place() {
        let f = facility(dec!(500), dec!(180));
        assert_eq!(f.utilization_percent(), dec!(64.0));
    }

    #[test]
    fn zero_capacity_reports_zero_utilization() {
        let f = facility(Decimal::ZERO, Decimal::ZERO);
        assert_eq!(f.utilization_percent(), Decimal::ZERO);
    }

    #[test]
    fn same_day_booking_bills_one_day() {
        let day = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
        let booking = ColdStorageBooking {
            id: Uuid::new_v4(),
            facility_id: Uuid::new_v4(),
            order_id: None,
            booked_by: Uuid::new_v4(),
            product_description: "Hass avocados".to_string(),
            quantity_tonnes: dec!(2.5),
            required_temp_min: 4,
            required_temp_max: 7,
            start_date: day,
            end_date: day,
            total_cost: Decimal::ZERO,
            status: BookingStatus::Pending,
            notes: None,
            created_at: Utc::now(),
        };
        assert_eq!(booking.duration_days(), 0);
        assert_eq!(booking.billable_days(), 1);
        assert_eq!(booking.cost_at_rate(dec!(850.00)), dec!(2125.00));
    }
}
