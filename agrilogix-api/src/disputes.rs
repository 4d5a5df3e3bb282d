use agrilogix_order::changes::OrderChange;
use agrilogix_order::disputes::{Dispute, DisputeManager, DisputeReason, DisputeStatus};
use agrilogix_order::ledger::OrderLedger;
use agrilogix_shared::models::events::DisputeRaisedEvent;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::AuthActor;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RaiseDisputeRequest {
    pub reason: DisputeReason,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ResolveDisputeRequest {
    pub status: DisputeStatus,
    pub resolution: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<DisputeStatus>,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/orders/{id}/disputes", post(raise_dispute))
        .route("/v1/disputes", get(list_disputes))
        .route("/v1/disputes/{id}/resolve", post(resolve_dispute))
}

/// POST /v1/orders/{id}/disputes
async fn raise_dispute(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(order_id): Path<Uuid>,
    Json(req): Json<RaiseDisputeRequest>,
) -> Result<Json<Dispute>, AppError> {
    let mut order = state
        .order_repo
        .get_order(order_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Order {}", order_id)))?;

    let ledger = OrderLedger::new(state.business_rules.platform_fee_rate())?;
    let (dispute, transition) = DisputeManager::new().raise(
        &ledger,
        &mut order,
        &actor,
        req.reason,
        req.description,
    )?;

    state
        .order_repo
        .update_order(&order)
        .await
        .map_err(AppError::from_repo)?;
    state
        .order_repo
        .create_dispute(&dispute)
        .await
        .map_err(AppError::from_repo)?;
    let _ = state
        .order_repo
        .add_order_change(&OrderChange::from_transition(
            &transition,
            Some("Dispute raised".to_string()),
        ))
        .await;
    let _ = state
        .notifier
        .dispute_raised(DisputeRaisedEvent {
            dispute_id: dispute.id,
            order_id,
            raised_by: actor.id,
            reason: format!("{:?}", dispute.reason),
            timestamp: dispute.created_at.timestamp(),
        })
        .await;

    Ok(Json(dispute))
}

/// GET /v1/disputes?status=
async fn list_disputes(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Dispute>>, AppError> {
    let disputes = state
        .order_repo
        .list_disputes(query.status)
        .await
        .map_err(AppError::from_repo)?;

    // Non-admins only see disputes they are party to
    let disputes = if actor.is_admin() {
        disputes
    } else {
        let mut visible = Vec::new();
        for dispute in disputes {
            if dispute.raised_by == actor.id {
                visible.push(dispute);
                continue;
            }
            if let Some(order) = state
                .order_repo
                .get_order(dispute.order_id)
                .await
                .map_err(AppError::from_repo)?
            {
                if order.buyer_id == actor.id || order.farmer_id == actor.id {
                    visible.push(dispute);
                }
            }
        }
        visible
    };

    Ok(Json(disputes))
}

/// POST /v1/disputes/{id}/resolve
async fn resolve_dispute(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(dispute_id): Path<Uuid>,
    Json(req): Json<ResolveDisputeRequest>,
) -> Result<Json<Dispute>, AppError> {
    let mut dispute = state
        .order_repo
        .get_dispute(dispute_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Dispute {}", dispute_id)))?;

    DisputeManager::new().resolve(&mut dispute, &actor, req.status, req.resolution)?;

    state
        .order_repo
        .update_dispute(&dispute)
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(dispute))
}
