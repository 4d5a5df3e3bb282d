use agrilogix_core::actor::{Actor, Role};
use agrilogix_core::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FarmType {
    Crop,
    Vegetable,
    Fruit,
    Mixed,
    Dairy,
    Poultry,
}

/// A registered farm. Farms are soft-deactivated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Farm {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub farm_type: FarmType,
    pub description: Option<String>,
    pub size_acres: Decimal,
    pub location_name: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub nearest_town: String,
    pub distance_to_road_km: Decimal,
    pub has_storage: bool,
    pub has_electricity: bool,
    pub water_source: Option<String>,
    pub certification: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Farm {
    /// Register a farm for the calling actor. Only farmers own farms.
    pub fn register(
        owner: &Actor,
        name: String,
        farm_type: FarmType,
        size_acres: Decimal,
        location_name: String,
        latitude: Decimal,
        longitude: Decimal,
        nearest_town: String,
    ) -> CoreResult<Self> {
        owner.require_role(Role::Farmer)?;
        if size_acres <= Decimal::ZERO {
            return Err(CoreError::ValidationError(
                "Farm size must be positive".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            owner_id: owner.id,
            name,
            farm_type,
            description: None,
            size_acres,
            location_name,
            latitude,
            longitude,
            nearest_town,
            distance_to_road_km: Decimal::ZERO,
            has_storage: false,
            has_electricity: false,
            water_source: None,
            certification: None,
            is_active: true,
            created_at: Utc::now(),
        })
    }

    /// Soft-deactivate instead of deleting.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPreference {
    Mpesa,
    Bank,
    Cash,
}

/// Commercial profile attached to a farmer account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmerProfile {
    pub user_id: Uuid,
    pub cooperative_name: Option<String>,
    pub years_experience: u32,
    pub preferred_payment: PaymentPreference,
    pub total_sales: Decimal,
    pub savings_vs_middleman: Decimal,
    pub is_premium: bool,
}

impl FarmerProfile {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            cooperative_name: None,
            years_experience: 0,
            preferred_payment: PaymentPreference::Mpesa,
            total_sales: Decimal::ZERO,
            savings_vs_middleman: Decimal::ZERO,
            is_premium: false,
        }
    }

    /// Roll a completed sale into the running totals. The middleman comparison is
    /// the earnings delta against the market reference price the buyer would have
    /// paid a broker.
    pub fn record_sale(&mut self, earnings: Decimal, savings: Decimal) {
        self.total_sales += earnings;
        self.savings_vs_middleman += savings;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn farmer() -> Actor {
        Actor::new(Uuid::new_v4(), Role::Farmer, "John Kamau")
    }

    #[test]
    fn only_farmers_register_farms() {
        let buyer = Actor::new(Uuid::new_v4(), Role::Buyer, "Carrefour Kenya");
        let result = Farm::register(
            &buyer,
            "Kamau Mixed Farm".to_string(),
            FarmType::Mixed,
            dec!(12.5),
            "Nakuru County".to_string(),
            dec!(-0.3031),
            dec!(36.0800),
            "Nakuru".to_string(),
        );
        assert!(matches!(result, Err(CoreError::Forbidden(_))));
    }

    #[test]
    fn rejects_non_positive_size() {
        let result = Farm::register(
            &farmer(),
            "Empty Farm".to_string(),
            FarmType::Crop,
            Decimal::ZERO,
            "Nyeri County".to_string(),
            dec!(-0.4167),
            dec!(36.9500),
            "Nyeri".to_string(),
        );
        assert!(matches!(result, Err(CoreError::ValidationError(_))));
    }

    #[test]
    fn sale_totals_accumulate() {
        let mut profile = FarmerProfile::new(Uuid::new_v4());
        profile.record_sale(dec!(12187.50), dec!(2500.00));
        profile.record_sale(dec!(4875.00), dec!(900.00));
        assert_eq!(profile.total_sales, dec!(17062.50));
        assert_eq!(profile.savings_vs_middleman, dec!(3400.00));
    }
}
