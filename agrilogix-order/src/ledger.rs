use crate::models::{Order, OrderItem, OrderStatus};
use agrilogix_core::actor::Actor;
use agrilogix_core::money::round_money;
use agrilogix_core::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A completed status transition, returned so callers can emit notifications and
/// audit records for it.
#[derive(Debug, Clone)]
pub struct OrderTransition {
    pub order_id: Uuid,
    pub order_number: String,
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub changed_by: Uuid,
    pub at: DateTime<Utc>,
}

/// Derived-value consistency for orders.
///
/// Every total on an order flows through these entrypoints; no mutation path
/// computes fees or subtotals on its own.
pub struct OrderLedger {
    fee_rate: Decimal,
}

impl OrderLedger {
    pub fn new(fee_rate: Decimal) -> CoreResult<Self> {
        if fee_rate < Decimal::ZERO || fee_rate >= Decimal::ONE {
            return Err(CoreError::ValidationError(format!(
                "Platform fee rate must be in [0, 1), got {}",
                fee_rate
            )));
        }
        Ok(Self { fee_rate })
    }

    pub fn fee_rate(&self) -> Decimal {
        self.fee_rate
    }

    /// Recompute an item's subtotal from quantity and unit price.
    pub fn recompute_item_subtotal(item: &mut OrderItem) -> CoreResult<Decimal> {
        if item.quantity < Decimal::ZERO {
            return Err(CoreError::ValidationError(
                "Item quantity cannot be negative".to_string(),
            ));
        }
        if item.unit_price < Decimal::ZERO {
            return Err(CoreError::ValidationError(
                "Item unit price cannot be negative".to_string(),
            ));
        }
        item.subtotal = round_money(item.quantity * item.unit_price);
        Ok(item.subtotal)
    }

    /// Recompute platform fee and total from the order's subtotal and shipping
    /// cost. Idempotent: unchanged inputs produce unchanged outputs.
    pub fn recompute_order_totals(&self, order: &mut Order) -> CoreResult<()> {
        if order.subtotal < Decimal::ZERO || order.shipping_cost < Decimal::ZERO {
            return Err(CoreError::ValidationError(
                "Order amounts cannot be negative".to_string(),
            ));
        }
        order.platform_fee = round_money(order.subtotal * self.fee_rate);
        order.total_amount = order.subtotal + order.shipping_cost + order.platform_fee;
        order.touch();
        Ok(())
    }

    /// Price an order from its items: recomputes each item subtotal, sums them
    /// into the order subtotal, then derives fee and total.
    pub fn price_order(&self, order: &mut Order, items: &mut [OrderItem]) -> CoreResult<()> {
        let mut subtotal = Decimal::ZERO;
        for item in items.iter_mut() {
            subtotal += Self::recompute_item_subtotal(item)?;
        }
        order.subtotal = subtotal;
        self.recompute_order_totals(order)
    }

    /// Move an order to a new status, enforcing the transition graph and the
    /// caller's standing on the order.
    pub fn transition(
        &self,
        order: &mut Order,
        new_status: OrderStatus,
        actor: &Actor,
    ) -> CoreResult<OrderTransition> {
        if actor.id != order.buyer_id && actor.id != order.farmer_id && !actor.is_admin() {
            return Err(CoreError::Forbidden(
                "Only the buyer, the farmer or an admin may update this order".to_string(),
            ));
        }
        if !order.status.can_transition_to(new_status) {
            return Err(CoreError::ValidationError(format!(
                "Invalid order transition from {} to {}",
                order.status, new_status
            )));
        }

        let from = order.status;
        let now = Utc::now();
        order.status = new_status;
        order.updated_at = now;
        match new_status {
            OrderStatus::Paid => {
                if order.payment_date.is_none() {
                    order.payment_date = Some(now);
                }
            }
            OrderStatus::Completed => {
                if order.completed_at.is_none() {
                    order.completed_at = Some(now);
                }
            }
            _ => {}
        }

        Ok(OrderTransition {
            order_id: order.id,
            order_number: order.order_number.clone(),
            from,
            to: new_status,
            changed_by: actor.id,
            at: now,
        })
    }

    /// Farmer confirmation of a pending order, with an optional note to the buyer.
    pub fn confirm(
        &self,
        order: &mut Order,
        actor: &Actor,
        farmer_notes: Option<String>,
    ) -> CoreResult<OrderTransition> {
        if actor.id != order.farmer_id {
            return Err(CoreError::Forbidden(
                "Only the selling farmer can confirm this order".to_string(),
            ));
        }
        if farmer_notes.is_some() {
            order.farmer_notes = farmer_notes;
        }
        self.transition(order, OrderStatus::Confirmed, actor)
    }
}

impl Default for OrderLedger {
    /// 2.5% platform commission.
    fn default() -> Self {
        Self {
            fee_rate: Decimal::new(25, 3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentMethod;
    use agrilogix_core::actor::Role;
    use rust_decimal_macros::dec;

    fn order_between(buyer: &Actor, farmer: &Actor) -> Order {
        Order::new(
            buyer.id,
            farmer.id,
            PaymentMethod::Mpesa,
            "Two Rivers Mall, Nairobi".to_string(),
        )
    }

    fn actors() -> (Actor, Actor) {
        (
            Actor::new(Uuid::new_v4(), Role::Buyer, "Carrefour Kenya"),
            Actor::new(Uuid::new_v4(), Role::Farmer, "Grace Wanjiku"),
        )
    }

    #[test]
    fn bulk_tomato_order_totals() {
        // 500 kg at 25/kg, shipping 3500, 2.5% commission
        let (buyer, farmer) = actors();
        let mut order = order_between(&buyer, &farmer);
        let mut items = vec![OrderItem::new(
            order.id,
            Uuid::new_v4(),
            "Tomatoes (Rio Grande)".to_string(),
            dec!(500),
            dec!(25.00),
        )];
        order.shipping_cost = dec!(3500);

        let ledger = OrderLedger::default();
        ledger.price_order(&mut order, &mut items).unwrap();

        assert_eq!(order.subtotal, dec!(12500.00));
        assert_eq!(order.platform_fee, dec!(312.50));
        assert_eq!(order.total_amount, dec!(16312.50));
        assert_eq!(order.farmer_earnings(), dec!(12187.50));
    }

    #[test]
    fn recompute_is_idempotent() {
        let (buyer, farmer) = actors();
        let mut order = order_between(&buyer, &farmer);
        order.subtotal = dec!(12500);
        order.shipping_cost = dec!(3500);

        let ledger = OrderLedger::default();
        ledger.recompute_order_totals(&mut order).unwrap();
        let first = (order.platform_fee, order.total_amount);
        ledger.recompute_order_totals(&mut order).unwrap();
        assert_eq!((order.platform_fee, order.total_amount), first);
    }

    #[test]
    fn item_subtotal_rejects_negatives() {
        let mut item = OrderItem::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Maize (90kg bags)".to_string(),
            dec!(-3),
            dec!(4200),
        );
        assert!(OrderLedger::recompute_item_subtotal(&mut item).is_err());

        item.quantity = dec!(3);
        item.unit_price = dec!(-1);
        assert!(OrderLedger::recompute_item_subtotal(&mut item).is_err());
    }

    #[test]
    fn fee_rate_bounds() {
        assert!(OrderLedger::new(dec!(0.025)).is_ok());
        assert!(OrderLedger::new(dec!(1)).is_err());
        assert!(OrderLedger::new(dec!(-0.01)).is_err());
    }

    #[test]
    fn strangers_cannot_transition() {
        let (buyer, farmer) = actors();
        let stranger = Actor::new(Uuid::new_v4(), Role::Buyer, "Quickmart Nakuru");
        let mut order = order_between(&buyer, &farmer);

        let ledger = OrderLedger::default();
        let result = ledger.transition(&mut order, OrderStatus::Cancelled, &stranger);
        assert!(matches!(result, Err(CoreError::Forbidden(_))));
    }

    #[test]
    fn confirm_requires_the_selling_farmer() {
        let (buyer, farmer) = actors();
        let mut order = order_between(&buyer, &farmer);

        let ledger = OrderLedger::default();
        assert!(ledger.confirm(&mut order, &buyer, None).is_err());

        let transition = ledger
            .confirm(&mut order, &farmer, Some("Ready Friday morning".to_string()))
            .unwrap();
        assert_eq!(transition.from, OrderStatus::Pending);
        assert_eq!(transition.to, OrderStatus::Confirmed);
        assert_eq!(order.farmer_notes.as_deref(), Some("Ready Friday morning"));
    }

    #[test]
    fn invalid_transition_is_rejected() {
        let (buyer, farmer) = actors();
        let mut order = order_between(&buyer, &farmer);

        let ledger = OrderLedger::default();
        let result = ledger.transition(&mut order, OrderStatus::Delivered, &buyer);
        assert!(matches!(result, Err(CoreError::ValidationError(_))));
    }

    #[test]
    fn completion_stamps_timestamp_once() {
        let (buyer, farmer) = actors();
        let mut order = order_between(&buyer, &farmer);
        order.status = OrderStatus::Delivered;

        let ledger = OrderLedger::default();
        ledger
            .transition(&mut order, OrderStatus::Completed, &buyer)
            .unwrap();
        assert!(order.completed_at.is_some());
    }
}
