use crate::models::TrackingPoint;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Append-only GPS trail for shipments.
pub struct TrackingLog {
    points: Vec<TrackingPoint>,
}

impl TrackingLog {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn append(
        &mut self,
        shipment_id: Uuid,
        latitude: Decimal,
        longitude: Decimal,
        speed_kmh: Decimal,
        status_note: Option<String>,
    ) -> TrackingPoint {
        let point = TrackingPoint {
            id: Uuid::new_v4(),
            shipment_id,
            latitude,
            longitude,
            speed_kmh,
            status_note,
            timestamp: Utc::now(),
        };
        self.points.push(point.clone());
        point
    }

    /// Most recent observation for a shipment.
    pub fn latest(&self, shipment_id: &Uuid) -> Option<&TrackingPoint> {
        self.points
            .iter()
            .filter(|p| p.shipment_id == *shipment_id)
            .max_by_key(|p| p.timestamp)
    }

    pub fn trail(&self, shipment_id: &Uuid) -> Vec<&TrackingPoint> {
        self.points
            .iter()
            .filter(|p| p.shipment_id == *shipment_id)
            .collect()
    }
}

impl Default for TrackingLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn latest_returns_newest_point() {
        let mut log = TrackingLog::new();
        let shipment_id = Uuid::new_v4();

        log.append(shipment_id, dec!(-0.3031), dec!(36.0800), dec!(0), None);
        log.append(
            shipment_id,
            dec!(-0.7500),
            dec!(36.5000),
            dec!(64.5),
            Some("Passing Naivasha".to_string()),
        );
        log.append(Uuid::new_v4(), dec!(-1.2833), dec!(36.8453), dec!(12), None);

        let latest = log.latest(&shipment_id).unwrap();
        assert_eq!(latest.speed_kmh, dec!(64.5));
        assert_eq!(log.trail(&shipment_id).len(), 2);
    }

    #[test]
    fn unknown_shipment_has_no_trail() {
        let log = TrackingLog::new();
        assert!(log.latest(&Uuid::new_v4()).is_none());
    }
}
