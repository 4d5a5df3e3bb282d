pub mod board;
pub mod models;
pub mod repository;
pub mod tracking;

pub use board::ShipmentBoard;
pub use models::{LogisticsRoute, Shipment, ShipmentStatus, TrackingPoint, Vehicle, VehicleType};
pub use tracking::TrackingLog;
