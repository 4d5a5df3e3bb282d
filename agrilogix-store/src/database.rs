use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres, Row};
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(connection_string: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(connection_string)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("../migrations").run(&self.pool).await?;
        info!("Migrations completed successfully.");
        Ok(())
    }

    /// Overlay configured business-rule defaults with rows from the
    /// business_rules table. Expected value format: {"value": <number>}.
    pub async fn fetch_business_rules(
        &self,
        defaults: crate::app_config::BusinessRules,
    ) -> Result<crate::app_config::BusinessRules, sqlx::Error> {
        let rows = sqlx::query("SELECT rule_key, rule_value FROM business_rules")
            .fetch_all(&self.pool)
            .await?;

        let mut rules = defaults;

        for row in rows {
            let key: String = row.try_get("rule_key")?;
            let val: Value = row.try_get("rule_value")?;

            if let Some(v) = val.get("value") {
                match key.as_str() {
                    "platform_fee_bps" => {
                        if let Some(u) = v.as_u64() {
                            rules.platform_fee_bps = u as u32;
                        }
                    }
                    "temperature_warning_margin_celsius" => {
                        if let Some(u) = v.as_u64() {
                            rules.temperature_warning_margin_celsius = u as u32;
                        }
                    }
                    "rate_limit_per_minute" => {
                        if let Some(i) = v.as_i64() {
                            rules.rate_limit_per_minute = i;
                        }
                    }
                    _ => {}
                }
            }
        }

        Ok(rules)
    }
}
