use crate::codec::{enum_str, parse_enum};
use agrilogix_coldchain::models::{ColdStorageBooking, ColdStorageFacility, TemperatureLog};
use agrilogix_coldchain::repository::ColdChainRepository;
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub struct PostgresColdChainRepository {
    pub pool: PgPool,
}

fn facility_from_row(row: &sqlx::postgres::PgRow) -> Result<ColdStorageFacility, sqlx::Error> {
    Ok(ColdStorageFacility {
        id: row.try_get("id")?,
        operator_id: row.try_get("operator_id")?,
        name: row.try_get("name")?,
        location_name: row.try_get("location_name")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        total_capacity_tonnes: row.try_get("total_capacity_tonnes")?,
        available_capacity_tonnes: row.try_get("available_capacity_tonnes")?,
        min_temperature_celsius: row.try_get("min_temperature_celsius")?,
        max_temperature_celsius: row.try_get("max_temperature_celsius")?,
        cost_per_tonne_per_day: row.try_get("cost_per_tonne_per_day")?,
        has_backup_generator: row.try_get("has_backup_generator")?,
        certification: row.try_get("certification")?,
        status: parse_enum(row.try_get::<String, _>("status")?.as_str())
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
    })
}

fn booking_from_row(row: &sqlx::postgres::PgRow) -> Result<ColdStorageBooking, sqlx::Error> {
    Ok(ColdStorageBooking {
        id: row.try_get("id")?,
        facility_id: row.try_get("facility_id")?,
        order_id: row.try_get("order_id")?,
        booked_by: row.try_get("booked_by")?,
        product_description: row.try_get("product_description")?,
        quantity_tonnes: row.try_get("quantity_tonnes")?,
        required_temp_min: row.try_get("required_temp_min")?,
        required_temp_max: row.try_get("required_temp_max")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        total_cost: row.try_get("total_cost")?,
        status: parse_enum(row.try_get::<String, _>("status")?.as_str())
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
    })
}

fn log_from_row(row: &sqlx::postgres::PgRow) -> Result<TemperatureLog, sqlx::Error> {
    Ok(TemperatureLog {
        id: row.try_get("id")?,
        booking_id: row.try_get("booking_id")?,
        shipment_id: row.try_get("shipment_id")?,
        sensor_id: row.try_get("sensor_id")?,
        temperature_celsius: row.try_get("temperature_celsius")?,
        humidity_percent: row.try_get("humidity_percent")?,
        alert_level: parse_enum(row.try_get::<String, _>("alert_level")?.as_str())
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        is_alert_sent: row.try_get("is_alert_sent")?,
        recorded_at: row.try_get("recorded_at")?,
    })
}

#[async_trait]
impl ColdChainRepository for PostgresColdChainRepository {
    async fn create_facility(
        &self,
        facility: &ColdStorageFacility,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO cold_storage_facilities (id, operator_id, name, location_name, latitude,
                                                 longitude, total_capacity_tonnes,
                                                 available_capacity_tonnes,
                                                 min_temperature_celsius, max_temperature_celsius,
                                                 cost_per_tonne_per_day, has_backup_generator,
                                                 certification, status, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(facility.id)
        .bind(facility.operator_id)
        .bind(&facility.name)
        .bind(&facility.location_name)
        .bind(facility.latitude)
        .bind(facility.longitude)
        .bind(facility.total_capacity_tonnes)
        .bind(facility.available_capacity_tonnes)
        .bind(facility.min_temperature_celsius)
        .bind(facility.max_temperature_celsius)
        .bind(facility.cost_per_tonne_per_day)
        .bind(facility.has_backup_generator)
        .bind(&facility.certification)
        .bind(enum_str(&facility.status))
        .bind(facility.is_active)
        .bind(facility.created_at)
        .execute(&self.pool)
        .await?;
        Ok(facility.id)
    }

    async fn get_facility(
        &self,
        id: Uuid,
    ) -> Result<Option<ColdStorageFacility>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query("SELECT * FROM cold_storage_facilities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref()
            .map(facility_from_row)
            .transpose()
            .map_err(Into::into)
    }

    async fn list_operational_facilities(
        &self,
    ) -> Result<Vec<ColdStorageFacility>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query(
            "SELECT * FROM cold_storage_facilities WHERE is_active AND status = 'operational'",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(facility_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    async fn update_facility(
        &self,
        facility: &ColdStorageFacility,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            UPDATE cold_storage_facilities
            SET available_capacity_tonnes = $2, cost_per_tonne_per_day = $3, status = $4,
                is_active = $5
            WHERE id = $1
            "#,
        )
        .bind(facility.id)
        .bind(facility.available_capacity_tonnes)
        .bind(facility.cost_per_tonne_per_day)
        .bind(enum_str(&facility.status))
        .bind(facility.is_active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn create_booking(
        &self,
        booking: &ColdStorageBooking,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO cold_storage_bookings (id, facility_id, order_id, booked_by,
                                               product_description, quantity_tonnes,
                                               required_temp_min, required_temp_max, start_date,
                                               end_date, total_cost, status, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(booking.id)
        .bind(booking.facility_id)
        .bind(booking.order_id)
        .bind(booking.booked_by)
        .bind(&booking.product_description)
        .bind(booking.quantity_tonnes)
        .bind(booking.required_temp_min)
        .bind(booking.required_temp_max)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.total_cost)
        .bind(enum_str(&booking.status))
        .bind(&booking.notes)
        .bind(booking.created_at)
        .execute(&self.pool)
        .await?;
        Ok(booking.id)
    }

    async fn get_booking(
        &self,
        id: Uuid,
    ) -> Result<Option<ColdStorageBooking>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query("SELECT * FROM cold_storage_bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref()
            .map(booking_from_row)
            .transpose()
            .map_err(Into::into)
    }

    async fn update_booking(
        &self,
        booking: &ColdStorageBooking,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            UPDATE cold_storage_bookings
            SET order_id = $2, quantity_tonnes = $3, start_date = $4, end_date = $5,
                total_cost = $6, status = $7, notes = $8
            WHERE id = $1
            "#,
        )
        .bind(booking.id)
        .bind(booking.order_id)
        .bind(booking.quantity_tonnes)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.total_cost)
        .bind(enum_str(&booking.status))
        .bind(&booking.notes)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn add_temperature_log(
        &self,
        log: &TemperatureLog,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO temperature_logs (id, booking_id, shipment_id, sensor_id,
                                          temperature_celsius, humidity_percent, alert_level,
                                          is_alert_sent, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(log.id)
        .bind(log.booking_id)
        .bind(log.shipment_id)
        .bind(&log.sensor_id)
        .bind(log.temperature_celsius)
        .bind(log.humidity_percent)
        .bind(enum_str(&log.alert_level))
        .bind(log.is_alert_sent)
        .bind(log.recorded_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn latest_temperature_log(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<TemperatureLog>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query(
            r#"
            SELECT * FROM temperature_logs
            WHERE booking_id = $1
            ORDER BY recorded_at DESC LIMIT 1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(log_from_row).transpose().map_err(Into::into)
    }

    async fn count_alerts(&self) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        let row =
            sqlx::query("SELECT COUNT(*) AS alerts FROM temperature_logs WHERE alert_level <> 'normal'")
                .fetch_one(&self.pool)
                .await?;
        let alerts: i64 = row.try_get("alerts")?;
        Ok(alerts as u64)
    }
}
