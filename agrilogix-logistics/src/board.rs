use crate::models::{Shipment, ShipmentStatus, Vehicle, VehicleStatus};
use agrilogix_core::actor::Actor;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Outcome of a shipment status update, returned for event emission.
#[derive(Debug, Clone)]
pub struct ShipmentTransition {
    pub shipment_id: Uuid,
    pub shipment_code: String,
    pub from: ShipmentStatus,
    pub to: ShipmentStatus,
    pub at: DateTime<Utc>,
}

/// Assignment and status handling for shipments.
///
/// Status values are free-form beyond enum membership (any status may follow any
/// other); the board's job is the side effects: timestamp stamping, the
/// scheduled-versus-actual ordering rules, and driver authorization.
pub struct ShipmentBoard;

impl ShipmentBoard {
    pub fn new() -> Self {
        Self
    }

    /// Assign a driver and vehicle to a pending shipment.
    pub fn assign(
        &self,
        shipment: &mut Shipment,
        driver: &Actor,
        vehicle: &Vehicle,
    ) -> Result<ShipmentTransition, BoardError> {
        if vehicle.driver_id != driver.id {
            return Err(BoardError::VehicleNotOwned {
                plate: vehicle.plate_number.clone(),
            });
        }
        if vehicle.status != VehicleStatus::Available {
            return Err(BoardError::VehicleUnavailable {
                plate: vehicle.plate_number.clone(),
            });
        }
        if shipment.requires_cold_chain && !vehicle.is_refrigerated {
            return Err(BoardError::ColdChainRequired {
                plate: vehicle.plate_number.clone(),
            });
        }
        if shipment.weight_kg > vehicle.capacity_kg {
            return Err(BoardError::OverCapacity {
                weight: shipment.weight_kg.to_string(),
                capacity: vehicle.capacity_kg.to_string(),
            });
        }

        shipment.driver_id = Some(driver.id);
        shipment.vehicle_id = Some(vehicle.id);
        self.apply_status(shipment, ShipmentStatus::Assigned, Utc::now())
    }

    /// Update shipment status on behalf of the assigned driver (or an admin).
    pub fn update_status(
        &self,
        shipment: &mut Shipment,
        new_status: ShipmentStatus,
        actor: &Actor,
        at: DateTime<Utc>,
    ) -> Result<ShipmentTransition, BoardError> {
        let is_assigned_driver = shipment.driver_id == Some(actor.id);
        if !is_assigned_driver && !actor.is_admin() {
            return Err(BoardError::NotAssignedDriver);
        }
        self.apply_status(shipment, new_status, at)
    }

    fn apply_status(
        &self,
        shipment: &mut Shipment,
        new_status: ShipmentStatus,
        at: DateTime<Utc>,
    ) -> Result<ShipmentTransition, BoardError> {
        match new_status {
            ShipmentStatus::PickedUp => {
                if shipment.actual_pickup.is_none() {
                    if at < shipment.scheduled_pickup {
                        return Err(BoardError::TimestampBeforeSchedule {
                            field: "actual_pickup",
                        });
                    }
                    shipment.actual_pickup = Some(at);
                }
            }
            ShipmentStatus::Delivered => {
                if shipment.actual_delivery.is_none() {
                    if let Some(pickup) = shipment.actual_pickup {
                        if at < pickup {
                            return Err(BoardError::TimestampBeforeSchedule {
                                field: "actual_delivery",
                            });
                        }
                    }
                    if let Some(estimate) = shipment.estimated_delivery {
                        if at < estimate {
                            return Err(BoardError::TimestampBeforeSchedule {
                                field: "actual_delivery",
                            });
                        }
                    }
                    shipment.actual_delivery = Some(at);
                }
            }
            _ => {}
        }

        let from = shipment.status;
        shipment.status = new_status;
        shipment.updated_at = at;
        Ok(ShipmentTransition {
            shipment_id: shipment.id,
            shipment_code: shipment.shipment_code.clone(),
            from,
            to: new_status,
            at,
        })
    }

    /// Record the buyer's rating of the driver after delivery.
    pub fn rate_driver(&self, shipment: &mut Shipment, rating: u8) -> Result<(), BoardError> {
        if shipment.status != ShipmentStatus::Delivered {
            return Err(BoardError::NotDelivered);
        }
        if !(1..=5).contains(&rating) {
            return Err(BoardError::RatingOutOfRange(rating));
        }
        shipment.driver_rating = Some(rating);
        Ok(())
    }
}

impl Default for ShipmentBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("Vehicle {plate} does not belong to the assigning driver")]
    VehicleNotOwned { plate: String },

    #[error("Vehicle {plate} is not available")]
    VehicleUnavailable { plate: String },

    #[error("Shipment requires a refrigerated vehicle, {plate} is not")]
    ColdChainRequired { plate: String },

    #[error("Load of {weight} kg exceeds vehicle capacity of {capacity} kg")]
    OverCapacity { weight: String, capacity: String },

    #[error("Only the assigned driver may update this shipment")]
    NotAssignedDriver,

    #[error("{field} cannot precede its scheduled counterpart")]
    TimestampBeforeSchedule { field: &'static str },

    #[error("Shipment has not been delivered yet")]
    NotDelivered,

    #[error("Driver rating {0} is outside 1..=5")]
    RatingOutOfRange(u8),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VehicleType;
    use agrilogix_core::actor::Role;
    use chrono::{Duration, NaiveDate};
    use rust_decimal_macros::dec;

    fn driver() -> Actor {
        Actor::new(Uuid::new_v4(), Role::Driver, "James Mwangi")
    }

    fn vehicle_for(driver: &Actor, refrigerated: bool) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            driver_id: driver.id,
            vehicle_type: if refrigerated {
                VehicleType::Refrigerated
            } else {
                VehicleType::TruckMedium
            },
            plate_number: "KDC 412X".to_string(),
            make_model: "Isuzu FRR".to_string(),
            year: 2021,
            capacity_kg: dec!(5000),
            is_refrigerated: refrigerated,
            refrigeration_min_temp: refrigerated.then_some(-2),
            refrigeration_max_temp: refrigerated.then_some(8),
            insurance_expiry: NaiveDate::from_ymd_opt(2027, 1, 31).unwrap(),
            inspection_expiry: NaiveDate::from_ymd_opt(2027, 1, 31).unwrap(),
            status: VehicleStatus::Available,
            current_latitude: None,
            current_longitude: None,
            last_location_update: None,
            created_at: Utc::now(),
        }
    }

    fn shipment(scheduled: DateTime<Utc>) -> Shipment {
        Shipment::new(
            Uuid::new_v4(),
            "Wanjiku Farm, Murang'a".to_string(),
            "Gikomba Market, Nairobi".to_string(),
            scheduled,
            dec!(800),
        )
    }

    #[test]
    fn assign_then_deliver_stamps_timestamps() {
        let board = ShipmentBoard::new();
        let driver = driver();
        let vehicle = vehicle_for(&driver, false);
        let scheduled = Utc::now() - Duration::hours(1);
        let mut shipment = shipment(scheduled);

        board.assign(&mut shipment, &driver, &vehicle).unwrap();
        assert_eq!(shipment.status, ShipmentStatus::Assigned);

        let pickup_at = Utc::now();
        board
            .update_status(&mut shipment, ShipmentStatus::PickedUp, &driver, pickup_at)
            .unwrap();
        assert_eq!(shipment.actual_pickup, Some(pickup_at));

        let delivery_at = pickup_at + Duration::hours(4);
        board
            .update_status(&mut shipment, ShipmentStatus::Delivered, &driver, delivery_at)
            .unwrap();
        assert_eq!(shipment.actual_delivery, Some(delivery_at));
    }

    #[test]
    fn pickup_before_schedule_is_rejected() {
        let board = ShipmentBoard::new();
        let driver = driver();
        let vehicle = vehicle_for(&driver, false);
        let scheduled = Utc::now() + Duration::hours(6);
        let mut shipment = shipment(scheduled);
        board.assign(&mut shipment, &driver, &vehicle).unwrap();

        let result =
            board.update_status(&mut shipment, ShipmentStatus::PickedUp, &driver, Utc::now());
        assert!(matches!(
            result,
            Err(BoardError::TimestampBeforeSchedule { .. })
        ));
    }

    #[test]
    fn timestamps_stamp_only_once() {
        let board = ShipmentBoard::new();
        let driver = driver();
        let vehicle = vehicle_for(&driver, false);
        let mut shipment = shipment(Utc::now() - Duration::hours(2));
        board.assign(&mut shipment, &driver, &vehicle).unwrap();

        let first = Utc::now();
        board
            .update_status(&mut shipment, ShipmentStatus::PickedUp, &driver, first)
            .unwrap();
        // A repeated picked_up update keeps the original stamp
        board
            .update_status(
                &mut shipment,
                ShipmentStatus::PickedUp,
                &driver,
                first + Duration::minutes(30),
            )
            .unwrap();
        assert_eq!(shipment.actual_pickup, Some(first));
    }

    #[test]
    fn cold_chain_needs_refrigeration() {
        let board = ShipmentBoard::new();
        let driver = driver();
        let dry_truck = vehicle_for(&driver, false);
        let mut shipment = shipment(Utc::now());
        shipment.requires_cold_chain = true;

        assert!(matches!(
            board.assign(&mut shipment, &driver, &dry_truck),
            Err(BoardError::ColdChainRequired { .. })
        ));

        let reefer = vehicle_for(&driver, true);
        assert!(board.assign(&mut shipment, &driver, &reefer).is_ok());
    }

    #[test]
    fn only_assigned_driver_updates() {
        let board = ShipmentBoard::new();
        let driver = driver();
        let other = Actor::new(Uuid::new_v4(), Role::Driver, "Paul Korir");
        let vehicle = vehicle_for(&driver, false);
        let mut shipment = shipment(Utc::now() - Duration::hours(1));
        board.assign(&mut shipment, &driver, &vehicle).unwrap();

        let result =
            board.update_status(&mut shipment, ShipmentStatus::InTransit, &other, Utc::now());
        assert!(matches!(result, Err(BoardError::NotAssignedDriver)));
    }

    #[test]
    fn rating_bounds() {
        let board = ShipmentBoard::new();
        let mut shipment = shipment(Utc::now());
        assert!(matches!(
            board.rate_driver(&mut shipment, 5),
            Err(BoardError::NotDelivered)
        ));

        shipment.status = ShipmentStatus::Delivered;
        assert!(matches!(
            board.rate_driver(&mut shipment, 0),
            Err(BoardError::RatingOutOfRange(0))
        ));
        board.rate_driver(&mut shipment, 4).unwrap();
        assert_eq!(shipment.driver_rating, Some(4));
    }
}
