use crate::product::{Product, ProductStatus};
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

/// Quantity accounting for product listings.
///
/// Placing an order reserves listed quantity, cancellation releases it, and a
/// listing that reaches zero flips to sold. Works over an in-memory view of the
/// products touched by the current operation; the caller persists the results.
pub struct ListingManager {
    products: HashMap<Uuid, Product>,
}

impl ListingManager {
    pub fn new() -> Self {
        Self {
            products: HashMap::new(),
        }
    }

    pub fn load(&mut self, product: Product) {
        self.products.insert(product.id, product);
    }

    pub fn get(&self, product_id: &Uuid) -> Option<&Product> {
        self.products.get(product_id)
    }

    /// Reserve quantity against a listing for a new order.
    pub fn reserve(&mut self, product_id: &Uuid, quantity: Decimal) -> Result<(), ListingError> {
        let product = self
            .products
            .get_mut(product_id)
            .ok_or_else(|| ListingError::NotFound(product_id.to_string()))?;

        if product.status != ProductStatus::Available {
            return Err(ListingError::NotAvailable(product.name.clone()));
        }
        if quantity < product.minimum_order_quantity {
            return Err(ListingError::BelowMinimumOrder {
                requested: quantity,
                minimum: product.minimum_order_quantity,
            });
        }
        if quantity > product.quantity_available {
            return Err(ListingError::InsufficientQuantity {
                requested: quantity,
                available: product.quantity_available,
            });
        }

        product.quantity_available -= quantity;
        if product.quantity_available.is_zero() {
            product.status = ProductStatus::Sold;
        }
        Ok(())
    }

    /// Return quantity to a listing when an order is cancelled.
    pub fn release(&mut self, product_id: &Uuid, quantity: Decimal) -> Result<(), ListingError> {
        let product = self
            .products
            .get_mut(product_id)
            .ok_or_else(|| ListingError::NotFound(product_id.to_string()))?;

        product.quantity_available += quantity;
        if product.status == ProductStatus::Sold && !product.quantity_available.is_zero() {
            product.status = ProductStatus::Available;
        }
        Ok(())
    }
}

impl Default for ListingManager {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Product is not available for ordering: {0}")]
    NotAvailable(String),

    #[error("Order quantity {requested} is below the minimum of {minimum}")]
    BelowMinimumOrder {
        requested: Decimal,
        minimum: Decimal,
    },

    #[error("Insufficient quantity: requested {requested}, available {available}")]
    InsufficientQuantity {
        requested: Decimal,
        available: Decimal,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Unit;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn listed_product(quantity: Decimal) -> Product {
        Product::new(
            Uuid::new_v4(),
            "French Beans".to_string(),
            quantity,
            Unit::Kg,
            dec!(80.00),
            NaiveDate::from_ymd_opt(2026, 7, 28).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn reserve_and_release_cycle() {
        let mut manager = ListingManager::new();
        let product = listed_product(dec!(200));
        let id = product.id;
        manager.load(product);

        manager.reserve(&id, dec!(150)).unwrap();
        assert_eq!(manager.get(&id).unwrap().quantity_available, dec!(50));

        manager.release(&id, dec!(150)).unwrap();
        assert_eq!(manager.get(&id).unwrap().quantity_available, dec!(200));
    }

    #[test]
    fn selling_out_flips_status() {
        let mut manager = ListingManager::new();
        let product = listed_product(dec!(90));
        let id = product.id;
        manager.load(product);

        manager.reserve(&id, dec!(90)).unwrap();
        assert_eq!(manager.get(&id).unwrap().status, ProductStatus::Sold);

        // A release after a cancelled order re-lists it
        manager.release(&id, dec!(90)).unwrap();
        assert_eq!(manager.get(&id).unwrap().status, ProductStatus::Available);
    }

    #[test]
    fn rejects_overdraw_and_below_minimum() {
        let mut manager = ListingManager::new();
        let mut product = listed_product(dec!(100));
        product.minimum_order_quantity = dec!(10);
        let id = product.id;
        manager.load(product);

        assert!(matches!(
            manager.reserve(&id, dec!(5)),
            Err(ListingError::BelowMinimumOrder { .. })
        ));
        assert!(matches!(
            manager.reserve(&id, dec!(150)),
            Err(ListingError::InsufficientQuantity { .. })
        ));
    }
}
