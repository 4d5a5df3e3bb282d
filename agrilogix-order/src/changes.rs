use crate::ledger::OrderTransition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One audited mutation of an order: what changed, who changed it, and the field
/// snapshots on either side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderChange {
    pub id: Uuid,
    pub order_id: Uuid,
    pub change_type: String,
    pub before: Option<serde_json::Value>,
    pub after: Option<serde_json::Value>,
    pub changed_by: Uuid,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OrderChange {
    pub fn from_transition(transition: &OrderTransition, note: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id: transition.order_id,
            change_type: "STATUS_CHANGE".to_string(),
            before: Some(serde_json::json!({ "status": transition.from.as_str() })),
            after: Some(serde_json::json!({ "status": transition.to.as_str() })),
            changed_by: transition.changed_by,
            note,
            created_at: transition.at,
        }
    }
}

/// Append-only audit trail of order changes.
pub struct ChangeLog {
    entries: Vec<OrderChange>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, change: OrderChange) {
        self.entries.push(change);
    }

    pub fn for_order(&self, order_id: &Uuid) -> Vec<&OrderChange> {
        self.entries
            .iter()
            .filter(|c| c.order_id == *order_id)
            .collect()
    }
}

impl Default for ChangeLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;

    #[test]
    fn transition_snapshots_both_sides() {
        let transition = OrderTransition {
            order_id: Uuid::new_v4(),
            order_number: "AGL-2026-AB12CD34".to_string(),
            from: OrderStatus::Pending,
            to: OrderStatus::Confirmed,
            changed_by: Uuid::new_v4(),
            at: Utc::now(),
        };
        let change = OrderChange::from_transition(&transition, None);
        assert_eq!(change.before.unwrap()["status"], "pending");
        assert_eq!(change.after.unwrap()["status"], "confirmed");
    }

    #[test]
    fn log_filters_by_order() {
        let mut log = ChangeLog::new();
        let order_a = Uuid::new_v4();
        for to in [OrderStatus::Confirmed, OrderStatus::Paid] {
            log.record(OrderChange::from_transition(
                &OrderTransition {
                    order_id: order_a,
                    order_number: "AGL-2026-AB12CD34".to_string(),
                    from: OrderStatus::Pending,
                    to,
                    changed_by: Uuid::new_v4(),
                    at: Utc::now(),
                },
                None,
            ));
        }
        assert_eq!(log.for_order(&order_a).len(), 2);
        assert!(log.for_order(&Uuid::new_v4()).is_empty());
    }
}
