use agrilogix_catalog::listing::{ListingError, ListingManager};
use agrilogix_core::actor::Role;
use agrilogix_order::changes::OrderChange;
use agrilogix_order::ledger::OrderLedger;
use agrilogix_order::models::{Order, OrderItem, OrderStatus, PaymentMethod};
use agrilogix_shared::models::events::{OrderPlacedEvent, OrderStatusChangedEvent};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
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
pub struct CreateOrderRequest {
    pub product_id: Uuid,
    pub quantity: Decimal,
    pub shipping_cost: Option<Decimal>,
    pub payment_method: PaymentMethod,
    pub delivery_address: String,
    pub requested_delivery_date: Option<NaiveDate>,
    pub buyer_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmOrderRequest {
    pub farmer_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: Order,
    pub farmer_earnings: Decimal,
    pub items: Vec<OrderItem>,
}

impl OrderResponse {
    fn new(order: Order, items: Vec<OrderItem>) -> Self {
        let farmer_earnings = order.farmer_earnings();
        Self {
            order,
            farmer_earnings,
            items,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/orders", get(list_orders).post(create_order))
        .route("/v1/orders/{id}", get(get_order))
        .route("/v1/orders/{id}/confirm", post(confirm_order))
        .route("/v1/orders/{id}/status", post(update_status))
}

/// POST /v1/orders
/// Place an order against a product listing
async fn create_order(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    actor.require_role(Role::Buyer)?;

    let shipping_cost = req.shipping_cost.unwrap_or(Decimal::ZERO);
    if shipping_cost < Decimal::ZERO {
        return Err(AppError::ValidationError(
            "Shipping cost cannot be negative".to_string(),
        ));
    }

    let product = state
        .product_repo
        .get_product(req.product_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Product {}", req.product_id)))?;

    let farm = state
        .farm_repo
        .get_farm(product.farm_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Farm {}", product.farm_id)))?;

    // Reserve the listed quantity before pricing anything
    let mut listings = ListingManager::new();
    let product_id = product.id;
    listings.load(product);
    listings
        .reserve(&product_id, req.quantity)
        .map_err(listing_error)?;
    let product = listings
        .get(&product_id)
        .cloned()
        .ok_or_else(|| AppError::InternalServerError("Listing state lost".to_string()))?;

    let requires_cold_chain = match product.category_id {
        Some(category_id) => state
            .coldchain_required(category_id)
            .await
            .map_err(AppError::from_repo)?,
        None => false,
    };

    let mut order = Order::new(actor.id, farm.owner_id, req.payment_method, req.delivery_address);
    order.shipping_cost = shipping_cost;
    order.requested_delivery_date = req.requested_delivery_date;
    order.buyer_notes = req.buyer_notes;

    let mut item = OrderItem::new(
        order.id,
        product.id,
        product.name.clone(),
        req.quantity,
        product.price_per_unit,
    );
    item.requires_cold_chain = requires_cold_chain;
    let mut items = vec![item];

    let ledger = OrderLedger::new(state.business_rules.platform_fee_rate())?;
    ledger.price_order(&mut order, &mut items)?;

    state
        .order_repo
        .create_order(&order, &items)
        .await
        .map_err(AppError::from_repo)?;
    state
        .product_repo
        .update_product(&product)
        .await
        .map_err(AppError::from_repo)?;

    state.metrics.orders_created.inc();
    let _ = state
        .notifier
        .order_placed(OrderPlacedEvent {
            order_id: order.id,
            order_number: order.order_number.clone(),
            buyer_id: order.buyer_id,
            farmer_id: order.farmer_id,
            total_amount: order.total_amount,
            timestamp: Utc::now().timestamp(),
        })
        .await;

    tracing::info!(
        "Order {} placed: {} x {} for {}",
        order.order_number,
        items[0].quantity,
        items[0].product_name,
        order.total_amount
    );
    Ok(Json(OrderResponse::new(order, items)))
}

/// GET /v1/orders/{id}
async fn get_order(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state
        .order_repo
        .get_order(order_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Order {}", order_id)))?;

    if actor.id != order.buyer_id && actor.id != order.farmer_id && !actor.is_admin() {
        return Err(AppError::AuthorizationError("Access denied".to_string()));
    }

    let items = state
        .order_repo
        .list_order_items(order_id)
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(OrderResponse::new(order, items)))
}

/// GET /v1/orders?status=
async fn list_orders(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = if actor.is_admin() {
        let all = state
            .order_repo
            .list_all_orders()
            .await
            .map_err(AppError::from_repo)?;
        match query.status {
            Some(status) => all.into_iter().filter(|o| o.status == status).collect(),
            None => all,
        }
    } else {
        state
            .order_repo
            .list_orders_for_party(actor.id, query.status)
            .await
            .map_err(AppError::from_repo)?
    };

    Ok(Json(orders))
}

/// POST /v1/orders/{id}/confirm
/// Farmer accepts a pending order
async fn confirm_order(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(order_id): Path<Uuid>,
    Json(req): Json<ConfirmOrderRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let mut order = state
        .order_repo
        .get_order(order_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Order {}", order_id)))?;

    let ledger = OrderLedger::new(state.business_rules.platform_fee_rate())?;
    let transition = ledger.confirm(&mut order, &actor, req.farmer_notes)?;

    state
        .order_repo
        .update_order(&order)
        .await
        .map_err(AppError::from_repo)?;
    let _ = state
        .order_repo
        .add_order_change(&OrderChange::from_transition(
            &transition,
            Some("Order confirmed by farmer".to_string()),
        ))
        .await;
    let _ = state
        .notifier
        .order_status_changed(OrderStatusChangedEvent {
            order_id: order.id,
            order_number: order.order_number.clone(),
            from_status: transition.from.to_string(),
            to_status: transition.to.to_string(),
            changed_by: actor.id,
            timestamp: transition.at.timestamp(),
        })
        .await;

    let items = state
        .order_repo
        .list_order_items(order_id)
        .await
        .map_err(AppError::from_repo)?;
    Ok(Json(OrderResponse::new(order, items)))
}

/// POST /v1/orders/{id}/status
/// Move an order through its lifecycle
async fn update_status(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(order_id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let mut order = state
        .order_repo
        .get_order(order_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Order {}", order_id)))?;

    let ledger = OrderLedger::new(state.business_rules.platform_fee_rate())?;
    let transition = ledger.transition(&mut order, req.status, &actor)?;

    // A cancelled order returns its reserved quantities to the listings
    if transition.to == OrderStatus::Cancelled {
        let items = state
            .order_repo
            .list_order_items(order_id)
            .await
            .map_err(AppError::from_repo)?;
        for item in &items {
            if let Some(product) = state
                .product_repo
                .get_product(item.product_id)
                .await
                .map_err(AppError::from_repo)?
            {
                let mut listings = ListingManager::new();
                listings.load(product);
                if listings.release(&item.product_id, item.quantity).is_ok() {
                    if let Some(product) = listings.get(&item.product_id) {
                        let _ = state.product_repo.update_product(product).await;
                    }
                }
            }
        }
    }
    if transition.to == OrderStatus::Completed {
        state.metrics.orders_completed.inc();
    }

    state
        .order_repo
        .update_order(&order)
        .await
        .map_err(AppError::from_repo)?;
    let _ = state
        .order_repo
        .add_order_change(&OrderChange::from_transition(&transition, None))
        .await;
    let _ = state
        .notifier
        .order_status_changed(OrderStatusChangedEvent {
            order_id: order.id,
            order_number: order.order_number.clone(),
            from_status: transition.from.to_string(),
            to_status: transition.to.to_string(),
            changed_by: actor.id,
            timestamp: transition.at.timestamp(),
        })
        .await;

    let items = state
        .order_repo
        .list_order_items(order_id)
        .await
        .map_err(AppError::from_repo)?;
    Ok(Json(OrderResponse::new(order, items)))
}

fn listing_error(err: ListingError) -> AppError {
    match err {
        ListingError::NotFound(msg) => AppError::NotFoundError(msg),
        ListingError::InsufficientQuantity { .. } => AppError::ConflictError(err.to_string()),
        _ => AppError::ValidationError(err.to_string()),
    }
}
