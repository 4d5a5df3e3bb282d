use crate::models::{BookingStatus, ColdStorageBooking, ColdStorageFacility, FacilityStatus};
use agrilogix_core::actor::Actor;
use agrilogix_core::{CoreError, CoreResult};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Booking lifecycle and facility capacity accounting.
///
/// Capacity is debited when a booking is confirmed, not when it is requested; a
/// pending booking holds nothing. Completion and cancellation credit it back.
pub struct BookingDesk;

impl BookingDesk {
    pub fn new() -> Self {
        Self
    }

    /// Request a booking against an operational facility. The cost is computed
    /// up front so the requester sees the bill before the operator confirms.
    pub fn request(
        &self,
        facility: &ColdStorageFacility,
        booked_by: &Actor,
        product_description: String,
        quantity_tonnes: Decimal,
        required_temp_min: i32,
        required_temp_max: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> CoreResult<ColdStorageBooking> {
        if facility.status != FacilityStatus::Operational || !facility.is_active {
            return Err(CoreError::ValidationError(format!(
                "Facility {} is not taking bookings",
                facility.name
            )));
        }
        if quantity_tonnes <= Decimal::ZERO {
            return Err(CoreError::ValidationError(
                "Booked quantity must be positive".to_string(),
            ));
        }
        if required_temp_min > required_temp_max {
            return Err(CoreError::ValidationError(
                "Required temperature range is inverted".to_string(),
            ));
        }
        if required_temp_min < facility.min_temperature_celsius
            || required_temp_max > facility.max_temperature_celsius
        {
            return Err(CoreError::ValidationError(format!(
                "Facility {} operates between {}°C and {}°C",
                facility.name, facility.min_temperature_celsius, facility.max_temperature_celsius
            )));
        }

        let mut booking = ColdStorageBooking {
            id: Uuid::new_v4(),
            facility_id: facility.id,
            order_id: None,
            booked_by: booked_by.id,
            product_description,
            quantity_tonnes,
            required_temp_min,
            required_temp_max,
            start_date,
            end_date,
            total_cost: Decimal::ZERO,
            status: BookingStatus::Pending,
            notes: None,
            created_at: Utc::now(),
        };
        self.recompute_cost(&mut booking, facility.cost_per_tonne_per_day)?;
        Ok(booking)
    }

    /// Recompute the booking cost from quantity, dates and the facility rate.
    /// Call after any change to those inputs.
    pub fn recompute_cost(
        &self,
        booking: &mut ColdStorageBooking,
        rate_per_tonne_per_day: Decimal,
    ) -> CoreResult<Decimal> {
        if booking.end_date < booking.start_date {
            return Err(CoreError::ValidationError(
                "Booking end date is before its start date".to_string(),
            ));
        }
        if rate_per_tonne_per_day < Decimal::ZERO {
            return Err(CoreError::ValidationError(
                "Storage rate cannot be negative".to_string(),
            ));
        }
        booking.total_cost = booking.cost_at_rate(rate_per_tonne_per_day);
        Ok(booking.total_cost)
    }

    /// Operator confirmation: debit facility capacity and hold it.
    pub fn confirm(
        &self,
        booking: &mut ColdStorageBooking,
        facility: &mut ColdStorageFacility,
        operator: &Actor,
    ) -> CoreResult<()> {
        if facility.operator_id != operator.id && !operator.is_admin() {
            return Err(CoreError::Forbidden(
                "Only the facility operator may confirm bookings".to_string(),
            ));
        }
        if booking.status != BookingStatus::Pending {
            return Err(CoreError::ValidationError(format!(
                "Cannot confirm a booking in the {} state",
                booking.status
            )));
        }
        if booking.quantity_tonnes > facility.available_capacity_tonnes {
            return Err(CoreError::ValidationError(format!(
                "Insufficient capacity: requested {}t, available {}t",
                booking.quantity_tonnes, facility.available_capacity_tonnes
            )));
        }

        facility.available_capacity_tonnes -= booking.quantity_tonnes;
        if facility.available_capacity_tonnes.is_zero() {
            facility.status = FacilityStatus::Full;
        }
        booking.status = BookingStatus::Confirmed;
        Ok(())
    }

    /// Goods received at the dock: a confirmed booking becomes active.
    pub fn activate(&self, booking: &mut ColdStorageBooking) -> CoreResult<()> {
        if booking.status != BookingStatus::Confirmed {
            return Err(CoreError::ValidationError(format!(
                "Cannot activate a booking in the {} state",
                booking.status
            )));
        }
        booking.status = BookingStatus::Active;
        Ok(())
    }

    /// Close out a booking, releasing its capacity hold if one exists.
    pub fn close(
        &self,
        booking: &mut ColdStorageBooking,
        facility: &mut ColdStorageFacility,
        outcome: BookingStatus,
    ) -> CoreResult<()> {
        if !matches!(outcome, BookingStatus::Completed | BookingStatus::Cancelled) {
            return Err(CoreError::ValidationError(
                "Bookings close to completed or cancelled only".to_string(),
            ));
        }
        if matches!(
            booking.status,
            BookingStatus::Completed | BookingStatus::Cancelled
        ) {
            return Err(CoreError::ValidationError(
                "Booking is already closed".to_string(),
            ));
        }

        if booking.status.holds_capacity() {
            facility.available_capacity_tonnes += booking.quantity_tonnes;
            if facility.status == FacilityStatus::Full
                && !facility.available_capacity_tonnes.is_zero()
            {
                facility.status = FacilityStatus::Operational;
            }
        }
        booking.status = outcome;
        Ok(())
    }
}

impl Default for BookingDesk {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrilogix_core::actor::Role;
    use rust_decimal_macros::dec;

    fn facility_with(operator: &Actor, available: Decimal) -> ColdStorageFacility {
        ColdStorageFacility {
            id: Uuid::new_v4(),
            operator_id: operator.id,
            name: "Rift Valley Cold Stores - Nakuru".to_string(),
            location_name: "Nakuru Town".to_string(),
            latitude: dec!(-0.2833),
            longitude: dec!(36.0667),
            total_capacity_tonnes: dec!(200),
            available_capacity_tonnes: available,
            min_temperature_celsius: 2,
            max_temperature_celsius: 10,
            cost_per_tonne_per_day: dec!(850.00),
            has_backup_generator: true,
            certification: Some("KEBS Certified".to_string()),
            status: FacilityStatus::Operational,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn operator() -> Actor {
        Actor::new(Uuid::new_v4(), Role::ColdStorage, "Rift Valley Cold Stores")
    }

    fn farmer() -> Actor {
        Actor::new(Uuid::new_v4(), Role::Farmer, "Daniel Kipkoech")
    }

    fn week_booking(desk: &BookingDesk, facility: &ColdStorageFacility) -> ColdStorageBooking {
        desk.request(
            facility,
            &farmer(),
            "French beans for export".to_string(),
            dec!(8.0),
            3,
            6,
            NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 17).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn week_long_booking_cost() {
        // 8 tonnes at 850/tonne/day for 7 days
        let desk = BookingDesk::new();
        let facility = facility_with(&operator(), dec!(90));
        let booking = week_booking(&desk, &facility);
        assert_eq!(booking.duration_days(), 7);
        assert_eq!(booking.total_cost, dec!(47600.00));
    }

    #[test]
    fn inverted_dates_rejected() {
        let desk = BookingDesk::new();
        let facility = facility_with(&operator(), dec!(90));
        let mut booking = week_booking(&desk, &facility);
        booking.start_date = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();
        let result = desk.recompute_cost(&mut booking, facility.cost_per_tonne_per_day);
        assert!(matches!(result, Err(CoreError::ValidationError(_))));
    }

    #[test]
    fn recompute_follows_rate_changes() {
        let desk = BookingDesk::new();
        let facility = facility_with(&operator(), dec!(90));
        let mut booking = week_booking(&desk, &facility);

        desk.recompute_cost(&mut booking, dec!(650.00)).unwrap();
        assert_eq!(booking.total_cost, dec!(36400.00));
    }

    #[test]
    fn confirmation_debits_capacity() {
        let desk = BookingDesk::new();
        let op = operator();
        let mut facility = facility_with(&op, dec!(10));
        let mut booking = week_booking(&desk, &facility);

        desk.confirm(&mut booking, &mut facility, &op).unwrap();
        assert_eq!(facility.available_capacity_tonnes, dec!(2.0));
        assert_eq!(booking.status, BookingStatus::Confirmed);
    }

    #[test]
    fn full_facility_rejects_and_release_reopens() {
        let desk = BookingDesk::new();
        let op = operator();
        let mut facility = facility_with(&op, dec!(8.0));
        let mut booking = week_booking(&desk, &facility);
        let mut second = week_booking(&desk, &facility);

        desk.confirm(&mut booking, &mut facility, &op).unwrap();
        assert_eq!(facility.status, FacilityStatus::Full);

        // Nothing left for the second booking
        assert!(desk.confirm(&mut second, &mut facility, &op).is_err());

        desk.close(&mut booking, &mut facility, BookingStatus::Completed)
            .unwrap();
        assert_eq!(facility.available_capacity_tonnes, dec!(8.0));
        assert_eq!(facility.status, FacilityStatus::Operational);
    }

    #[test]
    fn pending_cancellation_releases_nothing() {
        let desk = BookingDesk::new();
        let op = operator();
        let mut facility = facility_with(&op, dec!(50));
        let mut booking = week_booking(&desk, &facility);

        desk.close(&mut booking, &mut facility, BookingStatus::Cancelled)
            .unwrap();
        assert_eq!(facility.available_capacity_tonnes, dec!(50));
        assert_eq!(booking.status, BookingStatus::Cancelled);
    }

    #[test]
    fn range_outside_facility_band_rejected() {
        let desk = BookingDesk::new();
        let facility = facility_with(&operator(), dec!(50));
        let result = desk.request(
            &facility,
            &farmer(),
            "Frozen tilapia".to_string(),
            dec!(3.0),
            -18,
            -12,
            NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 12).unwrap(),
        );
        assert!(matches!(result, Err(CoreError::ValidationError(_))));
    }
}
