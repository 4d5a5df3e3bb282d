use agrilogix_shared::models::events::{
    BookingCreatedEvent, DisputeRaisedEvent, OrderPlacedEvent, OrderStatusChangedEvent,
    ShipmentStatusChangedEvent, TemperatureAlertEvent,
};
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use std::time::Duration;
use tracing::{error, info};

/// Publishes notification events for downstream dispatchers (SMS, in-app feeds).
/// The ledger itself only reports that a transition occurred.
pub struct Notifier {
    producer: FutureProducer,
    topic: String,
}

impl Notifier {
    pub fn new(brokers: &str, topic: &str) -> Result<Self, rdkafka::error::KafkaError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()?;

        Ok(Self {
            producer,
            topic: topic.to_string(),
        })
    }

    pub async fn order_placed(&self, event: OrderPlacedEvent) -> Result<(), String> {
        self.publish("order_placed", &event).await
    }

    pub async fn order_status_changed(&self, event: OrderStatusChangedEvent) -> Result<(), String> {
        self.publish("order_status_changed", &event).await
    }

    pub async fn shipment_status_changed(
        &self,
        event: ShipmentStatusChangedEvent,
    ) -> Result<(), String> {
        self.publish("shipment_status_changed", &event).await
    }

    pub async fn booking_created(&self, event: BookingCreatedEvent) -> Result<(), String> {
        self.publish("booking_created", &event).await
    }

    pub async fn temperature_alert(&self, event: TemperatureAlertEvent) -> Result<(), String> {
        self.publish("temperature_alert", &event).await
    }

    pub async fn dispute_raised(&self, event: DisputeRaisedEvent) -> Result<(), String> {
        self.publish("dispute_raised", &event).await
    }

    async fn publish<T: serde::Serialize>(&self, event_type: &str, payload: &T) -> Result<(), String> {
        let json = serde_json::to_string(payload).map_err(|e| e.to_string())?;

        let record = FutureRecord::to(&self.topic).payload(&json).key(event_type);

        match self.producer.send(record, Duration::from_secs(0)).await {
            Ok(delivery) => {
                info!(
                    "Published {} to {}: partition {} offset {}",
                    event_type, self.topic, delivery.partition, delivery.offset
                );
                Ok(())
            }
            Err((e, _msg)) => {
                error!("Failed to publish {}: {}", event_type, e);
                Err(e.to_string())
            }
        }
    }
}
