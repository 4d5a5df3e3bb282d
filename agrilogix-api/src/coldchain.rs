use agrilogix_coldchain::booking::BookingDesk;
use agrilogix_coldchain::models::{
    AlertLevel, BookingStatus, ColdStorageBooking, ColdStorageFacility,
};
use agrilogix_coldchain::temperature::TemperatureMonitor;
use agrilogix_core::actor::Role;
use agrilogix_shared::models::events::{BookingCreatedEvent, TemperatureAlertEvent};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::AuthActor;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateFacilityRequest {
    pub name: String,
    pub location_name: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub total_capacity_tonnes: Decimal,
    pub min_temperature_celsius: i32,
    pub max_temperature_celsius: i32,
    pub cost_per_tonne_per_day: Decimal,
    pub has_backup_generator: Option<bool>,
    pub certification: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub product_description: String,
    pub quantity_tonnes: Decimal,
    pub required_temp_min: i32,
    pub required_temp_max: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub order_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct BookingStatusRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Deserialize)]
pub struct TemperatureReadingRequest {
    pub sensor_id: String,
    pub temperature_celsius: Decimal,
    pub humidity_percent: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct FacilityResponse {
    #[serde(flatten)]
    pub facility: ColdStorageFacility,
    pub utilization_percent: Decimal,
}

impl From<ColdStorageFacility> for FacilityResponse {
    fn from(facility: ColdStorageFacility) -> Self {
        let utilization_percent = facility.utilization_percent();
        Self {
            facility,
            utilization_percent,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TemperatureResponse {
    pub sensor_id: String,
    pub temperature_celsius: Decimal,
    pub humidity_percent: Option<Decimal>,
    pub alert_level: String,
    pub recorded_at: DateTime<Utc>,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/facilities", get(list_facilities).post(create_facility))
        .route("/v1/facilities/{id}", get(get_facility))
        .route("/v1/facilities/{id}/bookings", post(create_booking))
        .route("/v1/bookings/{id}/status", post(update_booking_status))
        .route("/v1/bookings/{id}/temperature", post(record_temperature))
        .route(
            "/v1/bookings/{id}/temperature/latest",
            get(latest_temperature),
        )
}

/// GET /v1/facilities
async fn list_facilities(
    State(state): State<AppState>,
) -> Result<Json<Vec<FacilityResponse>>, AppError> {
    let facilities = state
        .coldchain_repo
        .list_operational_facilities()
        .await
        .map_err(AppError::from_repo)?;
    Ok(Json(facilities.into_iter().map(Into::into).collect()))
}

/// GET /v1/facilities/{id}
async fn get_facility(
    State(state): State<AppState>,
    Path(facility_id): Path<Uuid>,
) -> Result<Json<FacilityResponse>, AppError> {
    let facility = state
        .coldchain_repo
        .get_facility(facility_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Facility {}", facility_id)))?;
    Ok(Json(facility.into()))
}

/// POST /v1/facilities
async fn create_facility(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Json(req): Json<CreateFacilityRequest>,
) -> Result<Json<FacilityResponse>, AppError> {
    actor.require_role(Role::ColdStorage)?;

    if req.total_capacity_tonnes < Decimal::ZERO {
        return Err(AppError::ValidationError(
            "Capacity cannot be negative".to_string(),
        ));
    }
    if req.min_temperature_celsius > req.max_temperature_celsius {
        return Err(AppError::ValidationError(
            "Temperature band is inverted".to_string(),
        ));
    }
    if req.cost_per_tonne_per_day < Decimal::ZERO {
        return Err(AppError::ValidationError(
            "Storage rate cannot be negative".to_string(),
        ));
    }

    let facility = ColdStorageFacility {
        id: Uuid::new_v4(),
        operator_id: actor.id,
        name: req.name,
        location_name: req.location_name,
        latitude: req.latitude,
        longitude: req.longitude,
        total_capacity_tonnes: req.total_capacity_tonnes,
        available_capacity_tonnes: req.total_capacity_tonnes,
        min_temperature_celsius: req.min_temperature_celsius,
        max_temperature_celsius: req.max_temperature_celsius,
        cost_per_tonne_per_day: req.cost_per_tonne_per_day,
        has_backup_generator: req.has_backup_generator.unwrap_or(false),
        certification: req.certification,
        status: agrilogix_coldchain::models::FacilityStatus::Operational,
        is_active: true,
        created_at: Utc::now(),
    };

    state
        .coldchain_repo
        .create_facility(&facility)
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(facility.into()))
}

/// POST /v1/facilities/{id}/bookings
/// Request capacity; the quoted cost comes back immediately.
async fn create_booking(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(facility_id): Path<Uuid>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<ColdStorageBooking>, AppError> {
    let facility = state
        .coldchain_repo
        .get_facility(facility_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Facility {}", facility_id)))?;

    let mut booking = BookingDesk::new().request(
        &facility,
        &actor,
        req.product_description,
        req.quantity_tonnes,
        req.required_temp_min,
        req.required_temp_max,
        req.start_date,
        req.end_date,
    )?;
    booking.order_id = req.order_id;

    state
        .coldchain_repo
        .create_booking(&booking)
        .await
        .map_err(AppError::from_repo)?;

    state.metrics.bookings_created.inc();
    let _ = state
        .notifier
        .booking_created(BookingCreatedEvent {
            booking_id: booking.id,
            facility_id: facility.id,
            booked_by: actor.id,
            quantity_tonnes: booking.quantity_tonnes,
            total_cost: booking.total_cost,
            timestamp: booking.created_at.timestamp(),
        })
        .await;

    tracing::info!(
        "Booking {} at {}: {}t for KES {}",
        booking.id,
        facility.name,
        booking.quantity_tonnes,
        booking.total_cost
    );
    Ok(Json(booking))
}

/// POST /v1/bookings/{id}/status
/// Confirm, activate or close a booking; capacity accounting follows.
async fn update_booking_status(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<BookingStatusRequest>,
) -> Result<Json<ColdStorageBooking>, AppError> {
    let mut booking = state
        .coldchain_repo
        .get_booking(booking_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Booking {}", booking_id)))?;

    let mut facility = state
        .coldchain_repo
        .get_facility(booking.facility_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Facility {}", booking.facility_id)))?;

    let desk = BookingDesk::new();
    match req.status {
        BookingStatus::Confirmed => desk.confirm(&mut booking, &mut facility, &actor)?,
        BookingStatus::Active => {
            if facility.operator_id != actor.id && !actor.is_admin() {
                return Err(AppError::AuthorizationError(
                    "Only the facility operator may activate bookings".to_string(),
                ));
            }
            desk.activate(&mut booking)?
        }
        BookingStatus::Completed | BookingStatus::Cancelled => {
            let is_party = facility.operator_id == actor.id || booking.booked_by == actor.id;
            if !is_party && !actor.is_admin() {
                return Err(AppError::AuthorizationError(
                    "Not a party to this booking".to_string(),
                ));
            }
            desk.close(&mut booking, &mut facility, req.status)?
        }
        BookingStatus::Pending => {
            return Err(AppError::ValidationError(
                "Bookings cannot return to pending".to_string(),
            ))
        }
    }

    state
        .coldchain_repo
        .update_booking(&booking)
        .await
        .map_err(AppError::from_repo)?;
    state
        .coldchain_repo
        .update_facility(&facility)
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(booking))
}

/// POST /v1/bookings/{id}/temperature
/// Ingest a sensor reading; the alert level is derived, never supplied.
async fn record_temperature(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<TemperatureReadingRequest>,
) -> Result<Json<TemperatureResponse>, AppError> {
    let booking = state
        .coldchain_repo
        .get_booking(booking_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Booking {}", booking_id)))?;

    let monitor = TemperatureMonitor::new(state.business_rules.warning_margin());
    let mut log = monitor.record_for_booking(
        &booking,
        req.sensor_id,
        req.temperature_celsius,
        req.humidity_percent,
    );

    if log.alert_level != AlertLevel::Normal {
        state.metrics.temperature_alerts.inc();
        let sent = state
            .notifier
            .temperature_alert(TemperatureAlertEvent {
                booking_id: log.booking_id,
                shipment_id: log.shipment_id,
                sensor_id: log.sensor_id.clone(),
                temperature_celsius: log.temperature_celsius,
                alert_level: log.alert_level.as_str().to_string(),
                timestamp: log.recorded_at.timestamp(),
            })
            .await;
        log.is_alert_sent = sent.is_ok();
    }

    state
        .coldchain_repo
        .add_temperature_log(&log)
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(TemperatureResponse {
        sensor_id: log.sensor_id,
        temperature_celsius: log.temperature_celsius,
        humidity_percent: log.humidity_percent,
        alert_level: log.alert_level.as_str().to_string(),
        recorded_at: log.recorded_at,
    }))
}

/// GET /v1/bookings/{id}/temperature/latest
async fn latest_temperature(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<TemperatureResponse>, AppError> {
    let log = state
        .coldchain_repo
        .latest_temperature_log(booking_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError("No temperature data".to_string()))?;

    Ok(Json(TemperatureResponse {
        sensor_id: log.sensor_id,
        temperature_celsius: log.temperature_celsius,
        humidity_percent: log.humidity_percent,
        alert_level: log.alert_level.as_str().to_string(),
        recorded_at: log.recorded_at,
    }))
}
