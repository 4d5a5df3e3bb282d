use axum::{extract::State, routing::get, Router};
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

use crate::state::AppState;

/// Prometheus counters for the ledger's hot paths.
pub struct Metrics {
    pub registry: Registry,
    pub orders_created: IntCounter,
    pub orders_completed: IntCounter,
    pub shipments_delivered: IntCounter,
    pub bookings_created: IntCounter,
    pub temperature_alerts: IntCounter,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();
        let orders_created =
            IntCounter::new("agrilogix_orders_created_total", "Orders placed").unwrap();
        let orders_completed =
            IntCounter::new("agrilogix_orders_completed_total", "Orders completed").unwrap();
        let shipments_delivered =
            IntCounter::new("agrilogix_shipments_delivered_total", "Shipments delivered").unwrap();
        let bookings_created = IntCounter::new(
            "agrilogix_bookings_created_total",
            "Cold storage bookings created",
        )
        .unwrap();
        let temperature_alerts = IntCounter::new(
            "agrilogix_temperature_alerts_total",
            "Temperature excursion alerts",
        )
        .unwrap();

        for counter in [
            &orders_created,
            &orders_completed,
            &shipments_delivered,
            &bookings_created,
            &temperature_alerts,
        ] {
            registry.register(Box::new(counter.clone())).unwrap();
        }

        Self {
            registry,
            orders_created,
            orders_completed,
            shipments_delivered,
            bookings_created,
            temperature_alerts,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/metrics", get(scrape))
}

async fn scrape(State(state): State<AppState>) -> String {
    let encoder = TextEncoder::new();
    let families = state.metrics.registry.gather();
    let mut buffer = Vec::new();
    if encoder.encode(&families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
