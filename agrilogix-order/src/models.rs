use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Order status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Draft,
    Pending,
    Confirmed,
    PaymentPending,
    Paid,
    Processing,
    Dispatched,
    Delivered,
    Completed,
    Cancelled,
    Disputed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "draft",
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::PaymentPending => "payment_pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Processing => "processing",
            OrderStatus::Dispatched => "dispatched",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Disputed => "disputed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled)
    }

    /// The enforced transition graph: the forward lifecycle chain, cancellation
    /// from any non-terminal state, and dispute from confirmation onward.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        if *self == next {
            return false;
        }
        if next == Cancelled {
            return !matches!(self, Completed | Cancelled);
        }
        if next == Disputed {
            return matches!(
                self,
                Confirmed | PaymentPending | Paid | Processing | Dispatched | Delivered | Completed
            );
        }
        matches!(
            (self, next),
            (Draft, Pending)
                | (Pending, Confirmed)
                | (Confirmed, PaymentPending)
                | (Confirmed, Paid)
                | (PaymentPending, Paid)
                | (Paid, Processing)
                | (Processing, Dispatched)
                | (Dispatched, Delivered)
                | (Delivered, Completed)
                // Dispute resolution routes back into the lifecycle
                | (Disputed, Processing)
                | (Disputed, Completed)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(OrderStatus::Draft),
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "payment_pending" => Ok(OrderStatus::PaymentPending),
            "paid" => Ok(OrderStatus::Paid),
            "processing" => Ok(OrderStatus::Processing),
            "dispatched" => Ok(OrderStatus::Dispatched),
            "delivered" => Ok(OrderStatus::Delivered),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            "disputed" => Ok(OrderStatus::Disputed),
            other => Err(format!("Unknown order status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Mpesa,
    Bank,
    Cod,
    Escrow,
}

/// The single source of truth for a buyer's purchase from a farmer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub buyer_id: Uuid,
    pub farmer_id: Uuid,
    pub shipment_id: Option<Uuid>,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub platform_fee: Decimal,
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_reference: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub delivery_address: String,
    pub requested_delivery_date: Option<NaiveDate>,
    pub buyer_notes: Option<String>,
    pub farmer_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn new(
        buyer_id: Uuid,
        farmer_id: Uuid,
        payment_method: PaymentMethod,
        delivery_address: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            order_number: Self::generate_order_number(now),
            buyer_id,
            farmer_id,
            shipment_id: None,
            status: OrderStatus::Pending,
            subtotal: Decimal::ZERO,
            shipping_cost: Decimal::ZERO,
            platform_fee: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            payment_method,
            payment_reference: None,
            payment_date: None,
            delivery_address,
            requested_delivery_date: None,
            buyer_notes: None,
            farmer_notes: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Order numbers look like AGL-2026-3F09A1B2.
    fn generate_order_number(now: DateTime<Utc>) -> String {
        use chrono::Datelike;
        let tail = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
        format!("AGL-{}-{}", now.year(), tail)
    }

    /// What the farmer takes home after the platform commission.
    pub fn farmer_earnings(&self) -> Decimal {
        self.subtotal - self.platform_fee
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// An individual product line within an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub requires_cold_chain: bool,
    pub notes: Option<String>,
}

impl OrderItem {
    pub fn new(
        order_id: Uuid,
        product_id: Uuid,
        product_name: String,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            product_id,
            product_name,
            quantity,
            unit_price,
            subtotal: quantity * unit_price,
            requires_cold_chain: false,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_number_format() {
        let order = Order::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            PaymentMethod::Mpesa,
            "Gikomba Market, Nairobi".to_string(),
        );
        let parts: Vec<&str> = order.order_number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "AGL");
        assert_eq!(parts[2].len(), 8);
    }

    #[test]
    fn transition_graph_forward_chain() {
        use OrderStatus::*;
        let chain = [
            Draft,
            Pending,
            Confirmed,
            PaymentPending,
            Paid,
            Processing,
            Dispatched,
            Delivered,
            Completed,
        ];
        for pair in chain.windows(2) {
            assert!(
                pair[0].can_transition_to(pair[1]),
                "{} -> {} should be allowed",
                pair[0],
                pair[1]
            );
        }
        // No skipping ahead
        assert!(!Pending.can_transition_to(Paid));
        assert!(!Paid.can_transition_to(Delivered));
    }

    #[test]
    fn cancellation_blocked_only_for_terminal_states() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Dispatched.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn dispute_only_after_confirmation() {
        use OrderStatus::*;
        assert!(!Pending.can_transition_to(Disputed));
        assert!(Delivered.can_transition_to(Disputed));
        assert!(Completed.can_transition_to(Disputed));
        assert!(Disputed.can_transition_to(Completed));
    }
}
