use crate::ledger::{OrderLedger, OrderTransition};
use crate::models::{Order, OrderStatus};
use agrilogix_core::actor::Actor;
use agrilogix_core::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DisputeReason {
    Quality,
    Quantity,
    NotDelivered,
    LateDelivery,
    Payment,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    Open,
    Investigating,
    Resolved,
    Escalated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dispute {
    pub id: Uuid,
    pub order_id: Uuid,
    pub raised_by: Uuid,
    pub reason: DisputeReason,
    pub description: String,
    pub status: DisputeStatus,
    pub resolution: Option<String>,
    pub resolved_by: Option<Uuid>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Raising and resolving disputes against orders.
pub struct DisputeManager;

impl DisputeManager {
    pub fn new() -> Self {
        Self
    }

    /// Raise a dispute. Only a party to the order may raise one; the order moves
    /// to the disputed status through the ledger's transition graph.
    pub fn raise(
        &self,
        ledger: &OrderLedger,
        order: &mut Order,
        actor: &Actor,
        reason: DisputeReason,
        description: String,
    ) -> CoreResult<(Dispute, OrderTransition)> {
        if actor.id != order.buyer_id && actor.id != order.farmer_id {
            return Err(CoreError::Forbidden(
                "Only the buyer or the farmer may raise a dispute on this order".to_string(),
            ));
        }

        let transition = ledger.transition(order, OrderStatus::Disputed, actor)?;
        let dispute = Dispute {
            id: Uuid::new_v4(),
            order_id: order.id,
            raised_by: actor.id,
            reason,
            description,
            status: DisputeStatus::Open,
            resolution: None,
            resolved_by: None,
            resolved_at: None,
            created_at: transition.at,
        };
        Ok((dispute, transition))
    }

    /// Resolve or escalate an open dispute. Admin only.
    pub fn resolve(
        &self,
        dispute: &mut Dispute,
        actor: &Actor,
        status: DisputeStatus,
        resolution: String,
    ) -> CoreResult<()> {
        if !actor.is_admin() {
            return Err(CoreError::Forbidden(
                "Only admins can resolve disputes".to_string(),
            ));
        }
        if dispute.status == DisputeStatus::Resolved {
            return Err(CoreError::ValidationError(
                "Dispute is already resolved".to_string(),
            ));
        }
        if status == DisputeStatus::Open {
            return Err(CoreError::ValidationError(
                "Resolution cannot reopen a dispute".to_string(),
            ));
        }

        dispute.status = status;
        dispute.resolution = Some(resolution);
        dispute.resolved_by = Some(actor.id);
        dispute.resolved_at = Some(Utc::now());
        Ok(())
    }
}

impl Default for DisputeManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentMethod;
    use agrilogix_core::actor::Role;

    fn delivered_order(buyer: &Actor, farmer: &Actor) -> Order {
        let mut order = Order::new(
            buyer.id,
            farmer.id,
            PaymentMethod::Cod,
            "Westlands, Nairobi".to_string(),
        );
        order.status = OrderStatus::Delivered;
        order
    }

    #[test]
    fn buyer_raises_quality_dispute() {
        let buyer = Actor::new(Uuid::new_v4(), Role::Buyer, "Mama Mboga Collective");
        let farmer = Actor::new(Uuid::new_v4(), Role::Farmer, "Peter Odhiambo");
        let mut order = delivered_order(&buyer, &farmer);

        let (dispute, transition) = DisputeManager::new()
            .raise(
                &OrderLedger::default(),
                &mut order,
                &buyer,
                DisputeReason::Quality,
                "Half the crate arrived bruised".to_string(),
            )
            .unwrap();

        assert_eq!(order.status, OrderStatus::Disputed);
        assert_eq!(dispute.status, DisputeStatus::Open);
        assert_eq!(transition.to, OrderStatus::Disputed);
    }

    #[test]
    fn outsiders_cannot_dispute() {
        let buyer = Actor::new(Uuid::new_v4(), Role::Buyer, "Kisumu Wholesale Hub");
        let farmer = Actor::new(Uuid::new_v4(), Role::Farmer, "Rose Auma");
        let outsider = Actor::new(Uuid::new_v4(), Role::Driver, "Kevin Otieno");
        let mut order = delivered_order(&buyer, &farmer);

        let result = DisputeManager::new().raise(
            &OrderLedger::default(),
            &mut order,
            &outsider,
            DisputeReason::LateDelivery,
            "Kept waiting".to_string(),
        );
        assert!(matches!(result, Err(CoreError::Forbidden(_))));
    }

    #[test]
    fn only_admin_resolves() {
        let buyer = Actor::new(Uuid::new_v4(), Role::Buyer, "Nairobi Fresh Market");
        let farmer = Actor::new(Uuid::new_v4(), Role::Farmer, "Esther Chebet");
        let admin = Actor::new(Uuid::new_v4(), Role::Admin, "Platform Ops");
        let mut order = delivered_order(&buyer, &farmer);

        let manager = DisputeManager::new();
        let (mut dispute, _) = manager
            .raise(
                &OrderLedger::default(),
                &mut order,
                &farmer,
                DisputeReason::Payment,
                "Escrow not released".to_string(),
            )
            .unwrap();

        assert!(manager
            .resolve(
                &mut dispute,
                &farmer,
                DisputeStatus::Resolved,
                "n/a".to_string()
            )
            .is_err());

        manager
            .resolve(
                &mut dispute,
                &admin,
                DisputeStatus::Resolved,
                "Escrow released after delivery confirmation".to_string(),
            )
            .unwrap();
        assert_eq!(dispute.status, DisputeStatus::Resolved);
        assert!(dispute.resolved_at.is_some());

        // No double resolution
        assert!(manager
            .resolve(
                &mut dispute,
                &admin,
                DisputeStatus::Escalated,
                "again".to_string()
            )
            .is_err());
    }
}
