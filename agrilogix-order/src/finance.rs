use crate::models::{Order, OrderStatus};
use agrilogix_core::money::round_money;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-day aggregate of platform activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformReport {
    pub date: NaiveDate,
    pub total_orders: u64,
    pub completed_orders: u64,
    pub total_gmv: Decimal,
    pub total_farmer_earnings: Decimal,
    pub total_platform_fees: Decimal,
    pub shipments_delivered: u64,
    pub kg_transported: Decimal,
    pub temperature_alerts: u64,
}

/// A farmer's settlement view over a set of orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmerStatement {
    pub farmer_id: Uuid,
    pub completed_orders: u64,
    pub gross_sales: Decimal,
    pub platform_fees: Decimal,
    pub net_earnings: Decimal,
}

/// Handles financial aggregation for orders
pub struct FinancialManager;

impl FinancialManager {
    pub fn new() -> Self {
        Self
    }

    /// Gross merchandise value: total amount across completed orders.
    pub fn gmv(&self, orders: &[Order]) -> Decimal {
        orders
            .iter()
            .filter(|o| o.status == OrderStatus::Completed)
            .map(|o| o.total_amount)
            .sum()
    }

    /// Settlement summary for one farmer over the given orders.
    pub fn farmer_statement(&self, farmer_id: Uuid, orders: &[Order]) -> FarmerStatement {
        let completed: Vec<&Order> = orders
            .iter()
            .filter(|o| o.farmer_id == farmer_id && o.status == OrderStatus::Completed)
            .collect();

        let gross: Decimal = completed.iter().map(|o| o.subtotal).sum();
        let fees: Decimal = completed.iter().map(|o| o.platform_fee).sum();

        FarmerStatement {
            farmer_id,
            completed_orders: completed.len() as u64,
            gross_sales: round_money(gross),
            platform_fees: round_money(fees),
            net_earnings: round_money(gross - fees),
        }
    }

    /// Build the daily platform report from the day's orders and shipment stats.
    pub fn build_platform_report(
        &self,
        date: NaiveDate,
        orders: &[Order],
        shipments_delivered: u64,
        kg_transported: Decimal,
        temperature_alerts: u64,
    ) -> PlatformReport {
        let completed: Vec<&Order> = orders
            .iter()
            .filter(|o| o.status == OrderStatus::Completed)
            .collect();

        PlatformReport {
            date,
            total_orders: orders.len() as u64,
            completed_orders: completed.len() as u64,
            total_gmv: round_money(completed.iter().map(|o| o.total_amount).sum()),
            total_farmer_earnings: round_money(
                completed.iter().map(|o| o.farmer_earnings()).sum(),
            ),
            total_platform_fees: round_money(completed.iter().map(|o| o.platform_fee).sum()),
            shipments_delivered,
            kg_transported,
            temperature_alerts,
        }
    }
}

impl Default for FinancialManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::OrderLedger;
    use crate::models::{OrderItem, PaymentMethod};
    use rust_decimal_macros::dec;

    fn completed_order(farmer_id: Uuid, quantity: Decimal, price: Decimal) -> Order {
        let mut order = Order::new(
            Uuid::new_v4(),
            farmer_id,
            PaymentMethod::Escrow,
            "Kibuye Market, Kisumu".to_string(),
        );
        let mut items = vec![OrderItem::new(
            order.id,
            Uuid::new_v4(),
            "Cabbages".to_string(),
            quantity,
            price,
        )];
        OrderLedger::default()
            .price_order(&mut order, &mut items)
            .unwrap();
        order.status = OrderStatus::Completed;
        order
    }

    #[test]
    fn gmv_counts_only_completed() {
        let farmer = Uuid::new_v4();
        let done = completed_order(farmer, dec!(100), dec!(18.00));
        let mut open = completed_order(farmer, dec!(50), dec!(18.00));
        open.status = OrderStatus::Dispatched;

        let finance = FinancialManager::new();
        assert_eq!(finance.gmv(&[done.clone(), open]), done.total_amount);
    }

    #[test]
    fn farmer_statement_nets_out_fees() {
        let farmer = Uuid::new_v4();
        let orders = vec![
            completed_order(farmer, dec!(500), dec!(25.00)),
            completed_order(farmer, dec!(200), dec!(25.00)),
            completed_order(Uuid::new_v4(), dec!(100), dec!(40.00)),
        ];

        let statement = FinancialManager::new().farmer_statement(farmer, &orders);
        assert_eq!(statement.completed_orders, 2);
        assert_eq!(statement.gross_sales, dec!(17500.00));
        assert_eq!(statement.platform_fees, dec!(437.50));
        assert_eq!(statement.net_earnings, dec!(17062.50));
    }

    #[test]
    fn platform_report_aggregates() {
        let farmer = Uuid::new_v4();
        let orders = vec![
            completed_order(farmer, dec!(500), dec!(25.00)),
            completed_order(farmer, dec!(100), dec!(18.00)),
        ];
        let report = FinancialManager::new().build_platform_report(
            NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(),
            &orders,
            3,
            dec!(600),
            1,
        );
        assert_eq!(report.total_orders, 2);
        assert_eq!(report.completed_orders, 2);
        assert_eq!(
            report.total_gmv,
            orders[0].total_amount + orders[1].total_amount
        );
        assert_eq!(
            report.total_farmer_earnings + report.total_platform_fees,
            orders[0].subtotal + orders[1].subtotal
        );
    }
}
