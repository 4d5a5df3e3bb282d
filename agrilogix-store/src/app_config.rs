use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub kafka: KafkaConfig,
    pub auth: AuthConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Platform commission in basis points (250 = 2.5%).
    #[serde(default = "default_fee_bps")]
    pub platform_fee_bps: u32,
    /// How far outside the required range a reading may drift before it is
    /// critical rather than a warning.
    #[serde(default = "default_warning_margin")]
    pub temperature_warning_margin_celsius: u32,
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: i64,
}

fn default_fee_bps() -> u32 {
    250
}

fn default_warning_margin() -> u32 {
    2
}

fn default_rate_limit() -> i64 {
    100
}

impl BusinessRules {
    pub fn platform_fee_rate(&self) -> rust_decimal::Decimal {
        rust_decimal::Decimal::new(self.platform_fee_bps as i64, 4)
    }

    pub fn warning_margin(&self) -> rust_decimal::Decimal {
        rust_decimal::Decimal::from(self.temperature_warning_margin_celsius)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub notifications_topic: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file
            // Default to 'development' env
            // Note that this file is _optional_
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of AGRILOGIX)
            // Eg.. `AGRILOGIX_DEBUG=1` would set the `debug` key
            .add_source(config::Environment::with_prefix("AGRILOGIX").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn fee_bps_converts_to_rate() {
        let rules = BusinessRules {
            platform_fee_bps: 250,
            temperature_warning_margin_celsius: 2,
            rate_limit_per_minute: 100,
        };
        assert_eq!(rules.platform_fee_rate(), Decimal::new(25, 3));
        assert_eq!(rules.warning_margin(), Decimal::TWO);
    }
}
