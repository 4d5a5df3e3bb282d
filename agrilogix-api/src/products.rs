use agrilogix_catalog::farm::{Farm, FarmType};
use agrilogix_catalog::market::PriceTracker;
use agrilogix_catalog::product::{PriceHistory, Product, Unit};
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
pub struct CreateFarmRequest {
    pub name: String,
    pub farm_type: FarmType,
    pub size_acres: Decimal,
    pub location_name: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub nearest_town: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub farm_id: Uuid,
    pub name: String,
    pub variety: Option<String>,
    pub quantity_available: Decimal,
    pub unit: Unit,
    pub price_per_unit: Decimal,
    pub minimum_order_quantity: Option<Decimal>,
    pub harvest_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub is_organic: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePriceRequest {
    pub price_per_unit: Decimal,
    pub market_price: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    #[serde(flatten)]
    pub product: Product,
    pub total_value: Decimal,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        let total_value = product.total_value();
        Self {
            product,
            total_value,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/farms", get(list_farms).post(create_farm))
        .route("/v1/products", get(list_products).post(create_product))
        .route("/v1/products/{id}", get(get_product))
        .route("/v1/products/{id}/price", post(update_price))
}

/// GET /v1/farms
async fn list_farms(State(state): State<AppState>) -> Result<Json<Vec<Farm>>, AppError> {
    let farms = state
        .farm_repo
        .list_active_farms()
        .await
        .map_err(AppError::from_repo)?;
    Ok(Json(farms))
}

/// POST /v1/farms
/// Register a farm for the calling farmer
async fn create_farm(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Json(req): Json<CreateFarmRequest>,
) -> Result<Json<Farm>, AppError> {
    let farm = Farm::register(
        &actor,
        req.name,
        req.farm_type,
        req.size_acres,
        req.location_name,
        req.latitude,
        req.longitude,
        req.nearest_town,
    )?;

    state
        .farm_repo
        .create_farm(&farm)
        .await
        .map_err(AppError::from_repo)?;

    tracing::info!("Farm {} registered by {}", farm.name, actor.display_name);
    Ok(Json(farm))
}

/// GET /v1/products?q=
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = state
        .product_repo
        .list_available_products(query.q.as_deref())
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// GET /v1/products/{id}
/// Returns the listing with its market comparison, bumping the view counter.
async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut product = state
        .product_repo
        .get_product(product_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Product {}", product_id)))?;

    product.record_view();
    state
        .product_repo
        .update_product(&product)
        .await
        .map_err(AppError::from_repo)?;

    let observations = state
        .product_repo
        .list_market_prices(Some(&product.name))
        .await
        .map_err(AppError::from_repo)?;
    let comparison = PriceTracker::compare_to_market(&product, &observations);

    let total_value = product.total_value();
    Ok(Json(serde_json::json!({
        "product": product,
        "total_value": total_value,
        "market_comparison": comparison,
    })))
}

/// POST /v1/products
/// List produce for sale. The farm must belong to the calling farmer.
async fn create_product(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Json(req): Json<CreateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    actor.require_role(agrilogix_core::actor::Role::Farmer)?;

    let farm = state
        .farm_repo
        .get_farm(req.farm_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Farm {}", req.farm_id)))?;
    if farm.owner_id != actor.id {
        return Err(AppError::AuthorizationError(
            "Farm does not belong to you".to_string(),
        ));
    }

    let mut product = Product::new(
        farm.id,
        req.name,
        req.quantity_available,
        req.unit,
        req.price_per_unit,
        req.harvest_date,
    )?;
    product.variety = req.variety;
    product.expiry_date = req.expiry_date;
    product.is_organic = req.is_organic.unwrap_or(false);
    if let Some(moq) = req.minimum_order_quantity {
        if moq <= Decimal::ZERO {
            return Err(AppError::ValidationError(
                "Minimum order quantity must be positive".to_string(),
            ));
        }
        product.minimum_order_quantity = moq;
    }

    state
        .product_repo
        .create_product(&product)
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(product.into()))
}

/// POST /v1/products/{id}/price
/// Reprice a listing, recording the old price in the history.
async fn update_price(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(product_id): Path<Uuid>,
    Json(req): Json<UpdatePriceRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    if req.price_per_unit <= Decimal::ZERO {
        return Err(AppError::ValidationError(
            "Price per unit must be positive".to_string(),
        ));
    }

    let mut product = state
        .product_repo
        .get_product(product_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Product {}", product_id)))?;

    let farm = state
        .farm_repo
        .get_farm(product.farm_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFoundError(format!("Farm {}", product.farm_id)))?;
    if farm.owner_id != actor.id && !actor.is_admin() {
        return Err(AppError::AuthorizationError(
            "Only the listing farmer may reprice this product".to_string(),
        ));
    }

    product.price_per_unit = req.price_per_unit;
    state
        .product_repo
        .update_product(&product)
        .await
        .map_err(AppError::from_repo)?;

    let entry = PriceHistory {
        id: Uuid::new_v4(),
        product_id: product.id,
        price: product.price_per_unit,
        market_price: req.market_price,
        recorded_at: Utc::now(),
        notes: req.notes,
    };
    state
        .product_repo
        .add_price_history(&entry)
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(product.into()))
}
