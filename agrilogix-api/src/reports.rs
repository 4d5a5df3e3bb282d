use agrilogix_catalog::market::MarketPriceIndex;
use agrilogix_core::actor::Role;
use agrilogix_order::finance::{FarmerStatement, FinancialManager, PlatformReport};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::auth::AuthActor;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MarketPriceQuery {
    pub product: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/reports/platform", get(platform_report))
        .route("/v1/reports/farmer-statement", get(farmer_statement))
        .route("/v1/market-prices", get(market_prices))
}

/// GET /v1/reports/platform
/// Today's aggregate across orders, shipments and cold-chain alerts. Admin only.
async fn platform_report(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
) -> Result<Json<PlatformReport>, AppError> {
    actor.require_role(Role::Admin)?;

    let orders = state
        .order_repo
        .list_all_orders()
        .await
        .map_err(AppError::from_repo)?;
    let (shipments_delivered, kg_transported) = state
        .shipment_repo
        .delivered_stats()
        .await
        .map_err(AppError::from_repo)?;
    let temperature_alerts = state
        .coldchain_repo
        .count_alerts()
        .await
        .map_err(AppError::from_repo)?;

    let report = FinancialManager::new().build_platform_report(
        Utc::now().date_naive(),
        &orders,
        shipments_delivered,
        kg_transported,
        temperature_alerts,
    );
    Ok(Json(report))
}

/// GET /v1/reports/farmer-statement
/// The calling farmer's settlement view
async fn farmer_statement(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
) -> Result<Json<FarmerStatement>, AppError> {
    actor.require_role(Role::Farmer)?;

    let orders = state
        .order_repo
        .list_orders_for_party(actor.id, None)
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(
        FinancialManager::new().farmer_statement(actor.id, &orders),
    ))
}

/// GET /v1/market-prices?product=
async fn market_prices(
    State(state): State<AppState>,
    Query(query): Query<MarketPriceQuery>,
) -> Result<Json<Vec<MarketPriceIndex>>, AppError> {
    let prices = state
        .product_repo
        .list_market_prices(query.product.as_deref())
        .await
        .map_err(AppError::from_repo)?;
    Ok(Json(prices))
}
