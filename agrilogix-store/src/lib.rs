pub mod app_config;
pub mod catalog_repo;
pub mod coldchain_repo;
pub mod database;
pub mod events;
pub mod logistics_repo;
pub mod order_repo;
pub mod redis_repo;

pub use catalog_repo::PostgresCatalogRepository;
pub use coldchain_repo::PostgresColdChainRepository;
pub use database::DbClient;
pub use events::Notifier;
pub use logistics_repo::PostgresShipmentRepository;
pub use order_repo::PostgresOrderRepository;
pub use redis_repo::RedisClient;

pub(crate) mod codec {
    /// Persisted enums round-trip through their serde string form.
    pub fn enum_str<T: serde::Serialize>(value: &T) -> String {
        match serde_json::to_value(value) {
            Ok(serde_json::Value::String(s)) => s,
            _ => String::new(),
        }
    }

    pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, serde_json::Error> {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
    }
}
