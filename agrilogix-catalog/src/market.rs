use crate::product::{PriceHistory, Product};
use agrilogix_core::money::{percent_of, round_money};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wholesale price observation from a physical market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketPriceIndex {
    pub id: Uuid,
    pub market: String,
    pub product_name: String,
    pub price_per_kg: Decimal,
    pub recorded_date: NaiveDate,
}

/// How a listing's price sits against the wholesale reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceComparison {
    pub listed_price: Decimal,
    pub market_price: Decimal,
    /// Positive when the listing undercuts the market.
    pub buyer_saving_per_unit: Decimal,
    pub delta_percent: Decimal,
}

/// Records listing price changes and compares them against market observations.
pub struct PriceTracker {
    history: Vec<PriceHistory>,
}

impl PriceTracker {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
        }
    }

    /// Record a price point for a product, optionally against a market reference.
    pub fn record(
        &mut self,
        product: &Product,
        market_price: Option<Decimal>,
        notes: Option<String>,
    ) -> PriceHistory {
        let entry = PriceHistory {
            id: Uuid::new_v4(),
            product_id: product.id,
            price: product.price_per_unit,
            market_price,
            recorded_at: Utc::now(),
            notes,
        };
        self.history.push(entry.clone());
        entry
    }

    pub fn history_for(&self, product_id: &Uuid) -> Vec<&PriceHistory> {
        self.history
            .iter()
            .filter(|h| h.product_id == *product_id)
            .collect()
    }

    /// Compare a listing against the latest market observation for the same
    /// produce. Returns None when there is no observation to compare with.
    pub fn compare_to_market(
        product: &Product,
        observations: &[MarketPriceIndex],
    ) -> Option<PriceComparison> {
        let latest = observations
            .iter()
            .filter(|o| {
                product
                    .name
                    .to_lowercase()
                    .contains(&o.product_name.to_lowercase())
            })
            .max_by_key(|o| o.recorded_date)?;

        let saving = round_money(latest.price_per_kg - product.price_per_unit);
        Some(PriceComparison {
            listed_price: product.price_per_unit,
            market_price: latest.price_per_kg,
            buyer_saving_per_unit: saving,
            delta_percent: percent_of(saving, latest.price_per_kg),
        })
    }
}

impl Default for PriceTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Unit;
    use rust_decimal_macros::dec;

    fn observation(product: &str, price: Decimal, day: u32) -> MarketPriceIndex {
        MarketPriceIndex {
            id: Uuid::new_v4(),
            market: "Wakulima Market, Nairobi".to_string(),
            product_name: product.to_string(),
            price_per_kg: price,
            recorded_date: NaiveDate::from_ymd_opt(2026, 8, day).unwrap(),
        }
    }

    #[test]
    fn compares_against_latest_observation() {
        let product = Product::new(
            Uuid::new_v4(),
            "Tomatoes (Rio Grande)".to_string(),
            dec!(500),
            Unit::Kg,
            dec!(25.00),
            NaiveDate::from_ymd_opt(2026, 7, 20).unwrap(),
        )
        .unwrap();

        let observations = vec![
            observation("Tomatoes", dec!(28.00), 1),
            observation("Tomatoes", dec!(30.00), 3),
            observation("Cabbages", dec!(18.00), 3),
        ];

        let cmp = PriceTracker::compare_to_market(&product, &observations).unwrap();
        assert_eq!(cmp.market_price, dec!(30.00));
        assert_eq!(cmp.buyer_saving_per_unit, dec!(5.00));
        assert_eq!(cmp.delta_percent, dec!(16.7));
    }

    #[test]
    fn no_observation_no_comparison() {
        let product = Product::new(
            Uuid::new_v4(),
            "Passion Fruit".to_string(),
            dec!(40),
            Unit::Crate,
            dec!(900.00),
            NaiveDate::from_ymd_opt(2026, 7, 25).unwrap(),
        )
        .unwrap();
        assert!(PriceTracker::compare_to_market(&product, &[]).is_none());
    }

    #[test]
    fn history_is_per_product() {
        let mut tracker = PriceTracker::new();
        let a = Product::new(
            Uuid::new_v4(),
            "Avocados (Hass)".to_string(),
            dec!(300),
            Unit::Kg,
            dec!(120.00),
            NaiveDate::from_ymd_opt(2026, 7, 10).unwrap(),
        )
        .unwrap();
        tracker.record(&a, Some(dec!(135.00)), None);
        tracker.record(&a, None, Some("Mid-season adjustment".to_string()));
        assert_eq!(tracker.history_for(&a.id).len(), 2);
        assert!(tracker.history_for(&Uuid::new_v4()).is_empty());
    }
}
