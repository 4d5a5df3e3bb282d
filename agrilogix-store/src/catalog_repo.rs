use crate::codec::{enum_str, parse_enum};
use agrilogix_catalog::farm::Farm;
use agrilogix_catalog::market::MarketPriceIndex;
use agrilogix_catalog::product::{PriceHistory, Product};
use agrilogix_catalog::repository::{FarmRepository, ProductRepository};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub struct PostgresCatalogRepository {
    pub pool: PgPool,
}

fn farm_from_row(row: &sqlx::postgres::PgRow) -> Result<Farm, sqlx::Error> {
    Ok(Farm {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        name: row.try_get("name")?,
        farm_type: parse_enum(row.try_get::<String, _>("farm_type")?.as_str())
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        description: row.try_get("description")?,
        size_acres: row.try_get("size_acres")?,
        location_name: row.try_get("location_name")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        nearest_town: row.try_get("nearest_town")?,
        distance_to_road_km: row.try_get("distance_to_road_km")?,
        has_storage: row.try_get("has_storage")?,
        has_electricity: row.try_get("has_electricity")?,
        water_source: row.try_get("water_source")?,
        certification: row.try_get("certification")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
    })
}

fn product_from_row(row: &sqlx::postgres::PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: row.try_get("id")?,
        farm_id: row.try_get("farm_id")?,
        category_id: row.try_get("category_id")?,
        name: row.try_get("name")?,
        variety: row.try_get("variety")?,
        quantity_available: row.try_get("quantity_available")?,
        unit: parse_enum(row.try_get::<String, _>("unit")?.as_str())
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        price_per_unit: row.try_get("price_per_unit")?,
        minimum_order_quantity: row.try_get("minimum_order_quantity")?,
        harvest_date: row.try_get("harvest_date")?,
        expiry_date: row.try_get("expiry_date")?,
        is_organic: row.try_get("is_organic")?,
        is_certified: row.try_get("is_certified")?,
        status: parse_enum(row.try_get::<String, _>("status")?.as_str())
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        views_count: row.try_get::<i64, _>("views_count")? as u64,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl FarmRepository for PostgresCatalogRepository {
    async fn create_farm(
        &self,
        farm: &Farm,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO farms (id, owner_id, name, farm_type, description, size_acres,
                               location_name, latitude, longitude, nearest_town,
                               distance_to_road_km, has_storage, has_electricity,
                               water_source, certification, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(farm.id)
        .bind(farm.owner_id)
        .bind(&farm.name)
        .bind(enum_str(&farm.farm_type))
        .bind(&farm.description)
        .bind(farm.size_acres)
        .bind(&farm.location_name)
        .bind(farm.latitude)
        .bind(farm.longitude)
        .bind(&farm.nearest_town)
        .bind(farm.distance_to_road_km)
        .bind(farm.has_storage)
        .bind(farm.has_electricity)
        .bind(&farm.water_source)
        .bind(&farm.certification)
        .bind(farm.is_active)
        .bind(farm.created_at)
        .execute(&self.pool)
        .await?;

        Ok(farm.id)
    }

    async fn get_farm(
        &self,
        id: Uuid,
    ) -> Result<Option<Farm>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query("SELECT * FROM farms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(farm_from_row).transpose().map_err(Into::into)
    }

    async fn list_active_farms(
        &self,
    ) -> Result<Vec<Farm>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query("SELECT * FROM farms WHERE is_active ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(farm_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    async fn deactivate_farm(
        &self,
        id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query("UPDATE farms SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for PostgresCatalogRepository {
    async fn create_product(
        &self,
        product: &Product,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO products (id, farm_id, category_id, name, variety, quantity_available,
                                  unit, price_per_unit, minimum_order_quantity, harvest_date,
                                  expiry_date, is_organic, is_certified, status, views_count,
                                  created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(product.id)
        .bind(product.farm_id)
        .bind(product.category_id)
        .bind(&product.name)
        .bind(&product.variety)
        .bind(product.quantity_available)
        .bind(enum_str(&product.unit))
        .bind(product.price_per_unit)
        .bind(product.minimum_order_quantity)
        .bind(product.harvest_date)
        .bind(product.expiry_date)
        .bind(product.is_organic)
        .bind(product.is_certified)
        .bind(enum_str(&product.status))
        .bind(product.views_count as i64)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(product.id)
    }

    async fn get_product(
        &self,
        id: Uuid,
    ) -> Result<Option<Product>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref()
            .map(product_from_row)
            .transpose()
            .map_err(Into::into)
    }

    async fn list_available_products(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<Product>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = match search {
            Some(term) => {
                sqlx::query(
                    r#"
                    SELECT * FROM products
                    WHERE status = 'available' AND (name ILIKE $1 OR variety ILIKE $1)
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(format!("%{}%", term))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT * FROM products WHERE status = 'available' ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter()
            .map(product_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    async fn update_product(
        &self,
        product: &Product,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            UPDATE products
            SET name = $2, variety = $3, quantity_available = $4, price_per_unit = $5,
                minimum_order_quantity = $6, expiry_date = $7, is_organic = $8,
                is_certified = $9, status = $10, views_count = $11
            WHERE id = $1
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.variety)
        .bind(product.quantity_available)
        .bind(product.price_per_unit)
        .bind(product.minimum_order_quantity)
        .bind(product.expiry_date)
        .bind(product.is_organic)
        .bind(product.is_certified)
        .bind(enum_str(&product.status))
        .bind(product.views_count as i64)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_category(
        &self,
        id: Uuid,
    ) -> Result<Option<agrilogix_catalog::product::ProductCategory>, Box<dyn std::error::Error + Send + Sync>>
    {
        let row = sqlx::query("SELECT * FROM product_categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            Ok::<_, sqlx::Error>(agrilogix_catalog::product::ProductCategory {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                requires_cold_chain: row.try_get("requires_cold_chain")?,
                min_temp_celsius: row.try_get("min_temp_celsius")?,
                max_temp_celsius: row.try_get("max_temp_celsius")?,
            })
        })
        .transpose()
        .map_err(Into::into)
    }

    async fn add_price_history(
        &self,
        entry: &PriceHistory,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO price_history (id, product_id, price, market_price, recorded_at, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.id)
        .bind(entry.product_id)
        .bind(entry.price)
        .bind(entry.market_price)
        .bind(entry.recorded_at)
        .bind(&entry.notes)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_market_prices(
        &self,
        product_name: Option<&str>,
    ) -> Result<Vec<MarketPriceIndex>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = match product_name {
            Some(name) => {
                sqlx::query(
                    r#"
                    SELECT * FROM market_price_index
                    WHERE product_name ILIKE $1
                    ORDER BY recorded_date DESC LIMIT 100
                    "#,
                )
                .bind(format!("%{}%", name))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query("SELECT * FROM market_price_index ORDER BY recorded_date DESC LIMIT 100")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.iter()
            .map(|row| {
                Ok(MarketPriceIndex {
                    id: row.try_get("id")?,
                    market: row.try_get("market")?,
                    product_name: row.try_get("product_name")?,
                    price_per_kg: row.try_get("price_per_kg")?,
                    recorded_date: row.try_get("recorded_date")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(Into::into)
    }
}
