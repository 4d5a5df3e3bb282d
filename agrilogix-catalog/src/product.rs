use agrilogix_core::{CoreError, CoreResult};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Kg,
    Tonne,
    Crate,
    Bag,
    Litre,
    Dozen,
    Unit,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Available,
    Reserved,
    Sold,
    Expired,
}

/// Category with cold-chain requirements. Produce in a cold-chain category must be
/// held within the stated temperature band end to end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCategory {
    pub id: Uuid,
    pub name: String,
    pub requires_cold_chain: bool,
    pub min_temp_celsius: Option<i32>,
    pub max_temp_celsius: Option<i32>,
}

/// A produce listing on the marketplace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub farm_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub variety: Option<String>,
    pub quantity_available: Decimal,
    pub unit: Unit,
    pub price_per_unit: Decimal,
    pub minimum_order_quantity: Decimal,
    pub harvest_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub is_organic: bool,
    pub is_certified: bool,
    pub status: ProductStatus,
    pub views_count: u64,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        farm_id: Uuid,
        name: String,
        quantity_available: Decimal,
        unit: Unit,
        price_per_unit: Decimal,
        harvest_date: NaiveDate,
    ) -> CoreResult<Self> {
        if quantity_available < Decimal::ZERO {
            return Err(CoreError::ValidationError(
                "Listed quantity cannot be negative".to_string(),
            ));
        }
        if price_per_unit <= Decimal::ZERO {
            return Err(CoreError::ValidationError(
                "Price per unit must be positive".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            farm_id,
            category_id: None,
            name,
            variety: None,
            quantity_available,
            unit,
            price_per_unit,
            minimum_order_quantity: Decimal::ONE,
            harvest_date,
            expiry_date: None,
            is_organic: false,
            is_certified: false,
            status: ProductStatus::Available,
            views_count: 0,
            created_at: Utc::now(),
        })
    }

    /// Value of the remaining stock at the listed price.
    pub fn total_value(&self) -> Decimal {
        self.quantity_available * self.price_per_unit
    }

    pub fn record_view(&mut self) {
        self.views_count += 1;
    }

    /// Delisting keeps the row, mirrored by the expired status.
    pub fn delist(&mut self) {
        self.status = ProductStatus::Expired;
    }
}

/// Point-in-time price record for a product, with an optional wholesale market
/// reference for comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistory {
    pub id: Uuid,
    pub product_id: Uuid,
    pub price: Decimal,
    pub market_price: Option<Decimal>,
    pub recorded_at: DateTime<Utc>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tomatoes() -> Product {
        Product::new(
            Uuid::new_v4(),
            "Tomatoes (Rio Grande)".to_string(),
            dec!(500),
            Unit::Kg,
            dec!(25.00),
            NaiveDate::from_ymd_opt(2026, 7, 20).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn total_value_is_quantity_times_price() {
        let product = tomatoes();
        assert_eq!(product.total_value(), dec!(12500.00));
    }

    #[test]
    fn rejects_invalid_listings() {
        let negative_qty = Product::new(
            Uuid::new_v4(),
            "Sukuma Wiki".to_string(),
            dec!(-5),
            Unit::Kg,
            dec!(15.00),
            NaiveDate::from_ymd_opt(2026, 7, 20).unwrap(),
        );
        assert!(negative_qty.is_err());

        let free = Product::new(
            Uuid::new_v4(),
            "Sukuma Wiki".to_string(),
            dec!(5),
            Unit::Kg,
            Decimal::ZERO,
            NaiveDate::from_ymd_opt(2026, 7, 20).unwrap(),
        );
        assert!(free.is_err());
    }
}
