use crate::codec::{enum_str, parse_enum};
use agrilogix_logistics::models::{LogisticsRoute, Shipment, TrackingPoint, Vehicle};
use agrilogix_logistics::repository::ShipmentRepository;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub struct PostgresShipmentRepository {
    pub pool: PgPool,
}

fn shipment_from_row(row: &sqlx::postgres::PgRow) -> Result<Shipment, sqlx::Error> {
    Ok(Shipment {
        id: row.try_get("id")?,
        shipment_code: row.try_get("shipment_code")?,
        order_id: row.try_get("order_id")?,
        driver_id: row.try_get("driver_id")?,
        vehicle_id: row.try_get("vehicle_id")?,
        route_id: row.try_get("route_id")?,
        pickup_address: row.try_get("pickup_address")?,
        delivery_address: row.try_get("delivery_address")?,
        status: parse_enum(row.try_get::<String, _>("status")?.as_str())
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        scheduled_pickup: row.try_get("scheduled_pickup")?,
        actual_pickup: row.try_get("actual_pickup")?,
        estimated_delivery: row.try_get("estimated_delivery")?,
        actual_delivery: row.try_get("actual_delivery")?,
        shipping_cost: row.try_get("shipping_cost")?,
        weight_kg: row.try_get("weight_kg")?,
        requires_cold_chain: row.try_get("requires_cold_chain")?,
        notes: row.try_get("notes")?,
        driver_rating: row
            .try_get::<Option<i16>, _>("driver_rating")?
            .map(|r| r as u8),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn vehicle_from_row(row: &sqlx::postgres::PgRow) -> Result<Vehicle, sqlx::Error> {
    Ok(Vehicle {
        id: row.try_get("id")?,
        driver_id: row.try_get("driver_id")?,
        vehicle_type: parse_enum(row.try_get::<String, _>("vehicle_type")?.as_str())
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        plate_number: row.try_get("plate_number")?,
        make_model: row.try_get("make_model")?,
        year: row.try_get::<i32, _>("year")? as u32,
        capacity_kg: row.try_get("capacity_kg")?,
        is_refrigerated: row.try_get("is_refrigerated")?,
        refrigeration_min_temp: row.try_get("refrigeration_min_temp")?,
        refrigeration_max_temp: row.try_get("refrigeration_max_temp")?,
        insurance_expiry: row.try_get("insurance_expiry")?,
        inspection_expiry: row.try_get("inspection_expiry")?,
        status: parse_enum(row.try_get::<String, _>("status")?.as_str())
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        current_latitude: row.try_get("current_latitude")?,
        current_longitude: row.try_get("current_longitude")?,
        last_location_update: row.try_get("last_location_update")?,
        created_at: row.try_get("created_at")?,
    })
}

fn route_from_row(row: &sqlx::postgres::PgRow) -> Result<LogisticsRoute, sqlx::Error> {
    Ok(LogisticsRoute {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        origin_name: row.try_get("origin_name")?,
        destination_name: row.try_get("destination_name")?,
        distance_km: row.try_get("distance_km")?,
        estimated_duration_hours: row.try_get("estimated_duration_hours")?,
        base_cost_per_kg: row.try_get("base_cost_per_kg")?,
        is_cold_chain_available: row.try_get("is_cold_chain_available")?,
        is_active: row.try_get("is_active")?,
    })
}

#[async_trait]
impl ShipmentRepository for PostgresShipmentRepository {
    async fn create_shipment(
        &self,
        shipment: &Shipment,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO shipments (id, shipment_code, order_id, driver_id, vehicle_id, route_id,
                                   pickup_address, delivery_address, status, scheduled_pickup,
                                   actual_pickup, estimated_delivery, actual_delivery,
                                   shipping_cost, weight_kg, requires_cold_chain, notes,
                                   driver_rating, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            "#,
        )
        .bind(shipment.id)
        .bind(&shipment.shipment_code)
        .bind(shipment.order_id)
        .bind(shipment.driver_id)
        .bind(shipment.vehicle_id)
        .bind(shipment.route_id)
        .bind(&shipment.pickup_address)
        .bind(&shipment.delivery_address)
        .bind(enum_str(&shipment.status))
        .bind(shipment.scheduled_pickup)
        .bind(shipment.actual_pickup)
        .bind(shipment.estimated_delivery)
        .bind(shipment.actual_delivery)
        .bind(shipment.shipping_cost)
        .bind(shipment.weight_kg)
        .bind(shipment.requires_cold_chain)
        .bind(&shipment.notes)
        .bind(shipment.driver_rating.map(|r| r as i16))
        .bind(shipment.created_at)
        .bind(shipment.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(shipment.id)
    }

    async fn get_shipment(
        &self,
        id: Uuid,
    ) -> Result<Option<Shipment>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query("SELECT * FROM shipments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref()
            .map(shipment_from_row)
            .transpose()
            .map_err(Into::into)
    }

    async fn update_shipment(
        &self,
        shipment: &Shipment,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            UPDATE shipments
            SET driver_id = $2, vehicle_id = $3, route_id = $4, status = $5,
                actual_pickup = $6, estimated_delivery = $7, actual_delivery = $8,
                shipping_cost = $9, notes = $10, driver_rating = $11, updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(shipment.id)
        .bind(shipment.driver_id)
        .bind(shipment.vehicle_id)
        .bind(shipment.route_id)
        .bind(enum_str(&shipment.status))
        .bind(shipment.actual_pickup)
        .bind(shipment.estimated_delivery)
        .bind(shipment.actual_delivery)
        .bind(shipment.shipping_cost)
        .bind(&shipment.notes)
        .bind(shipment.driver_rating.map(|r| r as i16))
        .bind(shipment.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_shipments_for_driver(
        &self,
        driver_id: Uuid,
    ) -> Result<Vec<Shipment>, Box<dyn std::error::Error + Send + Sync>> {
        let rows =
            sqlx::query("SELECT * FROM shipments WHERE driver_id = $1 ORDER BY created_at DESC")
                .bind(driver_id)
                .fetch_all(&self.pool)
                .await?;

        rows.iter()
            .map(shipment_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    async fn add_tracking_point(
        &self,
        point: &TrackingPoint,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO shipment_tracking (id, shipment_id, latitude, longitude, speed_kmh,
                                           status_note, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(point.id)
        .bind(point.shipment_id)
        .bind(point.latitude)
        .bind(point.longitude)
        .bind(point.speed_kmh)
        .bind(&point.status_note)
        .bind(point.timestamp)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn latest_tracking_point(
        &self,
        shipment_id: Uuid,
    ) -> Result<Option<TrackingPoint>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query(
            r#"
            SELECT * FROM shipment_tracking
            WHERE shipment_id = $1
            ORDER BY recorded_at DESC LIMIT 1
            "#,
        )
        .bind(shipment_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            Ok::<_, sqlx::Error>(TrackingPoint {
                id: row.try_get("id")?,
                shipment_id: row.try_get("shipment_id")?,
                latitude: row.try_get("latitude")?,
                longitude: row.try_get("longitude")?,
                speed_kmh: row.try_get("speed_kmh")?,
                status_note: row.try_get("status_note")?,
                timestamp: row.try_get("recorded_at")?,
            })
        })
        .transpose()
        .map_err(Into::into)
    }

    async fn get_vehicle(
        &self,
        id: Uuid,
    ) -> Result<Option<Vehicle>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref()
            .map(vehicle_from_row)
            .transpose()
            .map_err(Into::into)
    }

    async fn create_vehicle(
        &self,
        vehicle: &Vehicle,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO vehicles (id, driver_id, vehicle_type, plate_number, make_model, year,
                                  capacity_kg, is_refrigerated, refrigeration_min_temp,
                                  refrigeration_max_temp, insurance_expiry, inspection_expiry,
                                  status, current_latitude, current_longitude,
                                  last_location_update, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(vehicle.id)
        .bind(vehicle.driver_id)
        .bind(enum_str(&vehicle.vehicle_type))
        .bind(&vehicle.plate_number)
        .bind(&vehicle.make_model)
        .bind(vehicle.year as i32)
        .bind(vehicle.capacity_kg)
        .bind(vehicle.is_refrigerated)
        .bind(vehicle.refrigeration_min_temp)
        .bind(vehicle.refrigeration_max_temp)
        .bind(vehicle.insurance_expiry)
        .bind(vehicle.inspection_expiry)
        .bind(enum_str(&vehicle.status))
        .bind(vehicle.current_latitude)
        .bind(vehicle.current_longitude)
        .bind(vehicle.last_location_update)
        .bind(vehicle.created_at)
        .execute(&self.pool)
        .await?;
        Ok(vehicle.id)
    }

    async fn update_vehicle_position(
        &self,
        id: Uuid,
        latitude: Decimal,
        longitude: Decimal,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            UPDATE vehicles
            SET current_latitude = $2, current_longitude = $3, last_location_update = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(latitude)
        .bind(longitude)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delivered_stats(
        &self,
    ) -> Result<(u64, Decimal), Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS delivered, COALESCE(SUM(weight_kg), 0) AS total_kg
            FROM shipments WHERE status = 'delivered'
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let delivered: i64 = row.try_get("delivered")?;
        let total_kg: Decimal = row.try_get("total_kg")?;
        Ok((delivered as u64, total_kg))
    }

    async fn list_active_routes(
        &self,
        cold_chain_only: bool,
    ) -> Result<Vec<LogisticsRoute>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = if cold_chain_only {
            sqlx::query(
                "SELECT * FROM logistics_routes WHERE is_active AND is_cold_chain_available",
            )
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query("SELECT * FROM logistics_routes WHERE is_active")
                .fetch_all(&self.pool)
                .await?
        };

        rows.iter()
            .map(route_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    async fn get_route(
        &self,
        id: Uuid,
    ) -> Result<Option<LogisticsRoute>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query("SELECT * FROM logistics_routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref()
            .map(route_from_row)
            .transpose()
            .map_err(Into::into)
    }
}
