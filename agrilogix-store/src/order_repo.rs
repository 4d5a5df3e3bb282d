use crate::codec::{enum_str, parse_enum};
use agrilogix_order::changes::OrderChange;
use agrilogix_order::disputes::{Dispute, DisputeStatus};
use agrilogix_order::models::{Order, OrderItem, OrderStatus};
use agrilogix_order::repository::OrderRepository;
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub struct PostgresOrderRepository {
    pub pool: PgPool,
}

fn order_from_row(row: &sqlx::postgres::PgRow) -> Result<Order, sqlx::Error> {
    Ok(Order {
        id: row.try_get("id")?,
        order_number: row.try_get("order_number")?,
        buyer_id: row.try_get("buyer_id")?,
        farmer_id: row.try_get("farmer_id")?,
        shipment_id: row.try_get("shipment_id")?,
        status: parse_enum(row.try_get::<String, _>("status")?.as_str())
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        subtotal: row.try_get("subtotal")?,
        shipping_cost: row.try_get("shipping_cost")?,
        platform_fee: row.try_get("platform_fee")?,
        total_amount: row.try_get("total_amount")?,
        payment_method: parse_enum(row.try_get::<String, _>("payment_method")?.as_str())
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        payment_reference: row.try_get("payment_reference")?,
        payment_date: row.try_get("payment_date")?,
        delivery_address: row.try_get("delivery_address")?,
        requested_delivery_date: row.try_get("requested_delivery_date")?,
        buyer_notes: row.try_get("buyer_notes")?,
        farmer_notes: row.try_get("farmer_notes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        completed_at: row.try_get("completed_at")?,
    })
}

fn item_from_row(row: &sqlx::postgres::PgRow) -> Result<OrderItem, sqlx::Error> {
    Ok(OrderItem {
        id: row.try_get("id")?,
        order_id: row.try_get("order_id")?,
        product_id: row.try_get("product_id")?,
        product_name: row.try_get("product_name")?,
        quantity: row.try_get("quantity")?,
        unit_price: row.try_get("unit_price")?,
        subtotal: row.try_get("subtotal")?,
        requires_cold_chain: row.try_get("requires_cold_chain")?,
        notes: row.try_get("notes")?,
    })
}

fn dispute_from_row(row: &sqlx::postgres::PgRow) -> Result<Dispute, sqlx::Error> {
    Ok(Dispute {
        id: row.try_get("id")?,
        order_id: row.try_get("order_id")?,
        raised_by: row.try_get("raised_by")?,
        reason: parse_enum(row.try_get::<String, _>("reason")?.as_str())
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        description: row.try_get("description")?,
        status: parse_enum(row.try_get::<String, _>("status")?.as_str())
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        resolution: row.try_get("resolution")?,
        resolved_by: row.try_get("resolved_by")?,
        resolved_at: row.try_get("resolved_at")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn create_order(
        &self,
        order: &Order,
        items: &[OrderItem],
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, order_number, buyer_id, farmer_id, shipment_id, status,
                                subtotal, shipping_cost, platform_fee, total_amount,
                                payment_method, payment_reference, payment_date,
                                delivery_address, requested_delivery_date, buyer_notes,
                                farmer_notes, created_at, updated_at, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            "#,
        )
        .bind(order.id)
        .bind(&order.order_number)
        .bind(order.buyer_id)
        .bind(order.farmer_id)
        .bind(order.shipment_id)
        .bind(enum_str(&order.status))
        .bind(order.subtotal)
        .bind(order.shipping_cost)
        .bind(order.platform_fee)
        .bind(order.total_amount)
        .bind(enum_str(&order.payment_method))
        .bind(&order.payment_reference)
        .bind(order.payment_date)
        .bind(&order.delivery_address)
        .bind(order.requested_delivery_date)
        .bind(&order.buyer_notes)
        .bind(&order.farmer_notes)
        .bind(order.created_at)
        .bind(order.updated_at)
        .bind(order.completed_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, product_id, product_name, quantity,
                                         unit_price, subtotal, requires_cold_chain, notes)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(item.id)
            .bind(item.order_id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.subtotal)
            .bind(item.requires_cold_chain)
            .bind(&item.notes)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(order.id)
    }

    async fn get_order(
        &self,
        id: Uuid,
    ) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(order_from_row).transpose().map_err(Into::into)
    }

    async fn list_order_items(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<OrderItem>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query("SELECT * FROM order_items WHERE order_id = $1")
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(item_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    async fn list_orders_for_party(
        &self,
        party_id: Uuid,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = match status {
            Some(status) => {
                sqlx::query(
                    r#"
                    SELECT * FROM orders
                    WHERE (buyer_id = $1 OR farmer_id = $1) AND status = $2
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(party_id)
                .bind(enum_str(&status))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT * FROM orders
                    WHERE buyer_id = $1 OR farmer_id = $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(party_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter()
            .map(order_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    async fn list_all_orders(
        &self,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query("SELECT * FROM orders ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(order_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    async fn update_order(
        &self,
        order: &Order,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            UPDATE orders
            SET shipment_id = $2, status = $3, subtotal = $4, shipping_cost = $5,
                platform_fee = $6, total_amount = $7, payment_reference = $8,
                payment_date = $9, farmer_notes = $10, updated_at = $11, completed_at = $12
            WHERE id = $1
            "#,
        )
        .bind(order.id)
        .bind(order.shipment_id)
        .bind(enum_str(&order.status))
        .bind(order.subtotal)
        .bind(order.shipping_cost)
        .bind(order.platform_fee)
        .bind(order.total_amount)
        .bind(&order.payment_reference)
        .bind(order.payment_date)
        .bind(&order.farmer_notes)
        .bind(order.updated_at)
        .bind(order.completed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn add_order_change(
        &self,
        change: &OrderChange,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO order_changes (id, order_id, change_type, before_state, after_state,
                                       changed_by, note, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(change.id)
        .bind(change.order_id)
        .bind(&change.change_type)
        .bind(&change.before)
        .bind(&change.after)
        .bind(change.changed_by)
        .bind(&change.note)
        .bind(change.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn create_dispute(
        &self,
        dispute: &Dispute,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO disputes (id, order_id, raised_by, reason, description, status,
                                  resolution, resolved_by, resolved_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(dispute.id)
        .bind(dispute.order_id)
        .bind(dispute.raised_by)
        .bind(enum_str(&dispute.reason))
        .bind(&dispute.description)
        .bind(enum_str(&dispute.status))
        .bind(&dispute.resolution)
        .bind(dispute.resolved_by)
        .bind(dispute.resolved_at)
        .bind(dispute.created_at)
        .execute(&self.pool)
        .await?;
        Ok(dispute.id)
    }

    async fn get_dispute(
        &self,
        id: Uuid,
    ) -> Result<Option<Dispute>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query("SELECT * FROM disputes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref()
            .map(dispute_from_row)
            .transpose()
            .map_err(Into::into)
    }

    async fn update_dispute(
        &self,
        dispute: &Dispute,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            UPDATE disputes
            SET status = $2, resolution = $3, resolved_by = $4, resolved_at = $5
            WHERE id = $1
            "#,
        )
        .bind(dispute.id)
        .bind(enum_str(&dispute.status))
        .bind(&dispute.resolution)
        .bind(dispute.resolved_by)
        .bind(dispute.resolved_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_disputes(
        &self,
        status: Option<DisputeStatus>,
    ) -> Result<Vec<Dispute>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = match status {
            Some(status) => {
                sqlx::query("SELECT * FROM disputes WHERE status = $1 ORDER BY created_at DESC")
                    .bind(enum_str(&status))
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("SELECT * FROM disputes ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.iter()
            .map(dispute_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }
}
