use agrilogix_core::actor::Role;
use agrilogix_logistics::board::{BoardError, ShipmentBoard};
use agrilogix_logistics::models::{
    LogisticsRoute, Shipment, ShipmentStatus, TrackingPoint, Vehicle, VehicleStatus, VehicleType,
};
use agrilogix_shared::models::events::ShipmentStatusChangedEvent;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
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
pub struct CreateShipmentRequest {
    pub pickup_address: String,
    pub scheduled_pickup: DateTime<Utc>,
    pub weight_kg: Decimal,
    pub route_id: Option<Uuid>,
    pub estimated_delivery: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub vehicle_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: ShipmentStatus,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub speed_kmh: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub rating: u8,
}

#[derive(Debug, Deserialize)]
pub struct CreateVehicleRequest {
    pub vehicle_type: VehicleType,
    pub plate_number: String,
    pub make_model: String,
    pub year: u32,
    pub capacity_kg: Decimal,
    pub is_refrigerated: Option<bool>,
    pub refrigeration_min_temp: Option<i32>,
    pub refrigeration_max_temp: Option<i32>,
    pub insurance_expiry: chrono::NaiveDate,
    pub inspection_expiry: chrono::NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct VehicleLocationRequest {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    pub cold_chain: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub shipment_code: String,
    pub status: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub speed_kmh: Decimal,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/orders/{id}/shipments", post(create_shipment))
        .route("/v1/shipments", get(list_shipments))
        .route("/v1/shipments/{id}/assign", post(assign_shipment))
        .route("/v1/shipments/{id}/status", post(update_status))
        .route("/v1/shipments/{id}/location", get(get_location))
        .route("/v1/shipments/{id}/rating", post(rate_driver))
        .route("/v1/routes", get(list_routes))
        .route("/v1/vehicles", post(create_vehicle))
        .route("/v1/vehicles/{id}/location", post(update_vehicle_location))
}

/// POST /v1/orders/{id}/shipments
/// Open a shipment for an order. The route, when given, prices the freight.
async fn create_shipment(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(order_id): Path<Uuid>,
    Json(req): Json<CreateShipmentRequest>,
) -> Result<Json<Shipment>, AppError> {
    let mut order = state
        .order_repo
        .get_order(order_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Order {}", order_id)))?;

    if actor.id != order.farmer_id && !actor.is_admin() {
        return Err(AppError::AuthorizationError(
            "Only the selling farmer may arrange shipment".to_string(),
        ));
    }
    if order.shipment_id.is_some() {
        return Err(AppError::ConflictError(
            "Order already has a shipment".to_string(),
        ));
    }
    if req.weight_kg <= Decimal::ZERO {
        return Err(AppError::ValidationError(
            "Shipment weight must be positive".to_string(),
        ));
    }

    let mut shipment = Shipment::new(
        order.id,
        req.pickup_address,
        order.delivery_address.clone(),
        req.scheduled_pickup,
        req.weight_kg,
    );
    shipment.estimated_delivery = req.estimated_delivery;

    let items = state
        .order_repo
        .list_order_items(order_id)
        .await
        .map_err(AppError::from_repo)?;
    shipment.requires_cold_chain = items.iter().any(|i| i.requires_cold_chain);

    if let Some(route_id) = req.route_id {
        let route = state
            .shipment_repo
            .get_route(route_id)
            .await
            .map_err(AppError::from_repo)?
            .ok_or_else(|| AppError::NotFoundError(format!("Route {}", route_id)))?;
        if shipment.requires_cold_chain && !route.is_cold_chain_available {
            return Err(AppError::ValidationError(format!(
                "Route {} has no cold-chain service",
                route.name
            )));
        }
        shipment.route_id = Some(route.id);
        shipment.shipping_cost = route.quote(shipment.weight_kg);
    } else {
        shipment.shipping_cost = order.shipping_cost;
    }

    state
        .shipment_repo
        .create_shipment(&shipment)
        .await
        .map_err(AppError::from_repo)?;

    order.shipment_id = Some(shipment.id);
    order.touch();
    state
        .order_repo
        .update_order(&order)
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(shipment))
}

/// GET /v1/shipments
/// A driver's own worklist
async fn list_shipments(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
) -> Result<Json<Vec<Shipment>>, AppError> {
    actor.require_any(&[Role::Driver, Role::Admin])?;
    let shipments = state
        .shipment_repo
        .list_shipments_for_driver(actor.id)
        .await
        .map_err(AppError::from_repo)?;
    Ok(Json(shipments))
}

/// POST /v1/shipments/{id}/assign
/// Driver takes the job with one of their vehicles
async fn assign_shipment(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(shipment_id): Path<Uuid>,
    Json(req): Json<AssignRequest>,
) -> Result<Json<Shipment>, AppError> {
    actor.require_role(Role::Driver)?;

    let mut shipment = state
        .shipment_repo
        .get_shipment(shipment_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Shipment {}", shipment_id)))?;

    let vehicle = state
        .shipment_repo
        .get_vehicle(req.vehicle_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Vehicle {}", req.vehicle_id)))?;

    let transition = ShipmentBoard::new()
        .assign(&mut shipment, &actor, &vehicle)
        .map_err(board_error)?;

    state
        .shipment_repo
        .update_shipment(&shipment)
        .await
        .map_err(AppError::from_repo)?;
    let _ = state
        .notifier
        .shipment_status_changed(ShipmentStatusChangedEvent {
            shipment_id: shipment.id,
            shipment_code: shipment.shipment_code.clone(),
            from_status: transition.from.to_string(),
            to_status: transition.to.to_string(),
            driver_id: shipment.driver_id,
            timestamp: transition.at.timestamp(),
        })
        .await;

    Ok(Json(shipment))
}

/// POST /v1/shipments/{id}/status
/// Driver status update, with an optional GPS fix appended to the trail
async fn update_status(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(shipment_id): Path<Uuid>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<Shipment>, AppError> {
    let mut shipment = state
        .shipment_repo
        .get_shipment(shipment_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Shipment {}", shipment_id)))?;

    let transition = ShipmentBoard::new()
        .update_status(&mut shipment, req.status, &actor, Utc::now())
        .map_err(board_error)?;

    state
        .shipment_repo
        .update_shipment(&shipment)
        .await
        .map_err(AppError::from_repo)?;

    if let (Some(latitude), Some(longitude)) = (req.latitude, req.longitude) {
        let point = TrackingPoint {
            id: Uuid::new_v4(),
            shipment_id: shipment.id,
            latitude,
            longitude,
            speed_kmh: req.speed_kmh.unwrap_or(Decimal::ZERO),
            status_note: Some(format!("Status updated to {}", shipment.status)),
            timestamp: transition.at,
        };
        let _ = state.shipment_repo.add_tracking_point(&point).await;

        // Keep the live-location cache warm for pollers
        if let Ok(json) = serde_json::to_string(&point) {
            let _ = state
                .redis
                .set_shipment_position(&shipment.id.to_string(), &json, 300)
                .await;
        }
    }

    if transition.to == ShipmentStatus::Delivered {
        state.metrics.shipments_delivered.inc();
    }
    let _ = state
        .notifier
        .shipment_status_changed(ShipmentStatusChangedEvent {
            shipment_id: shipment.id,
            shipment_code: shipment.shipment_code.clone(),
            from_status: transition.from.to_string(),
            to_status: transition.to.to_string(),
            driver_id: shipment.driver_id,
            timestamp: transition.at.timestamp(),
        })
        .await;

    Ok(Json(shipment))
}

/// GET /v1/shipments/{id}/location
/// Latest GPS fix, served from cache when fresh
async fn get_location(
    State(state): State<AppState>,
    Path(shipment_id): Path<Uuid>,
) -> Result<Json<LocationResponse>, AppError> {
    let shipment = state
        .shipment_repo
        .get_shipment(shipment_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Shipment {}", shipment_id)))?;

    let cached: Option<TrackingPoint> = state
        .redis
        .get_shipment_position(&shipment_id.to_string())
        .await
        .ok()
        .flatten()
        .and_then(|json| serde_json::from_str(&json).ok());

    let point = match cached {
        Some(point) => point,
        None => state
            .shipment_repo
            .latest_tracking_point(shipment_id)
            .await
            .map_err(AppError::from_repo)?
            .ok_or_else(|| AppError::NotFoundError("No tracking data".to_string()))?,
    };

    Ok(Json(LocationResponse {
        shipment_code: shipment.shipment_code,
        status: shipment.status.to_string(),
        latitude: point.latitude,
        longitude: point.longitude,
        speed_kmh: point.speed_kmh,
        timestamp: point.timestamp,
    }))
}

/// POST /v1/shipments/{id}/rating
/// Buyer rates the delivery
async fn rate_driver(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(shipment_id): Path<Uuid>,
    Json(req): Json<RatingRequest>,
) -> Result<Json<Shipment>, AppError> {
    let mut shipment = state
        .shipment_repo
        .get_shipment(shipment_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Shipment {}", shipment_id)))?;

    let order = state
        .order_repo
        .get_order(shipment.order_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Order {}", shipment.order_id)))?;
    if order.buyer_id != actor.id {
        return Err(AppError::AuthorizationError(
            "Only the buyer may rate this delivery".to_string(),
        ));
    }

    ShipmentBoard::new()
        .rate_driver(&mut shipment, req.rating)
        .map_err(board_error)?;
    state
        .shipment_repo
        .update_shipment(&shipment)
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(shipment))
}

/// GET /v1/routes?cold_chain=true
async fn list_routes(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<Vec<LogisticsRoute>>, AppError> {
    let routes = state
        .shipment_repo
        .list_active_routes(query.cold_chain.unwrap_or(false))
        .await
        .map_err(AppError::from_repo)?;
    Ok(Json(routes))
}

/// POST /v1/vehicles
/// Register a vehicle for the calling driver
async fn create_vehicle(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Json(req): Json<CreateVehicleRequest>,
) -> Result<Json<Vehicle>, AppError> {
    actor.require_role(Role::Driver)?;

    if req.capacity_kg <= Decimal::ZERO {
        return Err(AppError::ValidationError(
            "Vehicle capacity must be positive".to_string(),
        ));
    }

    let vehicle = Vehicle {
        id: Uuid::new_v4(),
        driver_id: actor.id,
        vehicle_type: req.vehicle_type,
        plate_number: req.plate_number,
        make_model: req.make_model,
        year: req.year,
        capacity_kg: req.capacity_kg,
        is_refrigerated: req.is_refrigerated.unwrap_or(false),
        refrigeration_min_temp: req.refrigeration_min_temp,
        refrigeration_max_temp: req.refrigeration_max_temp,
        insurance_expiry: req.insurance_expiry,
        inspection_expiry: req.inspection_expiry,
        status: VehicleStatus::Available,
        current_latitude: None,
        current_longitude: None,
        last_location_update: None,
        created_at: Utc::now(),
    };

    state
        .shipment_repo
        .create_vehicle(&vehicle)
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(vehicle))
}

/// POST /v1/vehicles/{id}/location
/// Driver GPS ping
async fn update_vehicle_location(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(vehicle_id): Path<Uuid>,
    Json(req): Json<VehicleLocationRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let vehicle = state
        .shipment_repo
        .get_vehicle(vehicle_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Vehicle {}", vehicle_id)))?;
    if vehicle.driver_id != actor.id {
        return Err(AppError::AuthorizationError(
            "Vehicle does not belong to you".to_string(),
        ));
    }

    state
        .shipment_repo
        .update_vehicle_position(vehicle_id, req.latitude, req.longitude)
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(serde_json::json!({ "status": "updated" })))
}

fn board_error(err: BoardError) -> AppError {
    match err {
        BoardError::NotAssignedDriver => AppError::AuthorizationError(err.to_string()),
        BoardError::VehicleUnavailable { .. } | BoardError::VehicleNotOwned { .. } => {
            AppError::ConflictError(err.to_string())
        }
        _ => AppError::ValidationError(err.to_string()),
    }
}
