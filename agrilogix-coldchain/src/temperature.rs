use crate::models::{AlertLevel, ColdStorageBooking, TemperatureLog};
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Classifies sensor readings against a booking's required range.
///
/// The alert level is always derived here, never taken from the sensor payload:
/// in range is normal, within the warning margin outside it is a warning, and
/// anything further is critical spoilage risk.
pub struct TemperatureMonitor {
    warning_margin_celsius: Decimal,
}

impl TemperatureMonitor {
    pub fn new(warning_margin_celsius: Decimal) -> Self {
        Self {
            warning_margin_celsius,
        }
    }

    pub fn classify(&self, temperature: Decimal, range_min: i32, range_max: i32) -> AlertLevel {
        let min = Decimal::from(range_min);
        let max = Decimal::from(range_max);

        if temperature >= min && temperature <= max {
            return AlertLevel::Normal;
        }
        let excursion = if temperature < min {
            min - temperature
        } else {
            temperature - max
        };
        if excursion <= self.warning_margin_celsius {
            AlertLevel::Warning
        } else {
            AlertLevel::Critical
        }
    }

    /// Build a log entry for a booking reading. The caller persists it and, for
    /// non-normal levels, emits an alert event.
    pub fn record_for_booking(
        &self,
        booking: &ColdStorageBooking,
        sensor_id: String,
        temperature_celsius: Decimal,
        humidity_percent: Option<Decimal>,
    ) -> TemperatureLog {
        let alert_level = self.classify(
            temperature_celsius,
            booking.required_temp_min,
            booking.required_temp_max,
        );
        TemperatureLog {
            id: Uuid::new_v4(),
            booking_id: Some(booking.id),
            shipment_id: None,
            sensor_id,
            temperature_celsius,
            humidity_percent,
            alert_level,
            is_alert_sent: false,
            recorded_at: Utc::now(),
        }
    }
}

impl Default for TemperatureMonitor {
    /// Two degrees of grace before an excursion is critical.
    fn default() -> Self {
        Self::new(Decimal::TWO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn booking(min: i32, max: i32) -> ColdStorageBooking {
        ColdStorageBooking {
            id: Uuid::new_v4(),
            facility_id: Uuid::new_v4(),
            order_id: None,
            booked_by: Uuid::new_v4(),
            product_description: "Passion fruit".to_string(),
            quantity_tonnes: dec!(1.5),
            required_temp_min: min,
            required_temp_max: max,
            start_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 8, 8).unwrap(),
            total_cost: dec!(0),
            status: BookingStatus::Active,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn in_range_is_normal() {
        let monitor = TemperatureMonitor::default();
        assert_eq!(monitor.classify(dec!(5.1), 2, 8), AlertLevel::Normal);
        assert_eq!(monitor.classify(dec!(2), 2, 8), AlertLevel::Normal);
        assert_eq!(monitor.classify(dec!(8), 2, 8), AlertLevel::Normal);
    }

    #[test]
    fn small_excursions_warn() {
        let monitor = TemperatureMonitor::default();
        assert_eq!(monitor.classify(dec!(9.5), 2, 8), AlertLevel::Warning);
        assert_eq!(monitor.classify(dec!(0.5), 2, 8), AlertLevel::Warning);
    }

    #[test]
    fn large_excursions_are_critical() {
        let monitor = TemperatureMonitor::default();
        assert_eq!(monitor.classify(dec!(14.3), 2, 8), AlertLevel::Critical);
        assert_eq!(monitor.classify(dec!(-4), 2, 8), AlertLevel::Critical);
    }

    #[test]
    fn reading_level_comes_from_the_range_not_the_caller() {
        let monitor = TemperatureMonitor::default();
        let booking = booking(4, 7);
        let log = monitor.record_for_booking(&booking, "SNSR-NAI-002".to_string(), dec!(14.3), None);
        assert_eq!(log.alert_level, AlertLevel::Critical);
        assert!(!log.is_alert_sent);
        assert_eq!(log.booking_id, Some(booking.id));
    }
}
