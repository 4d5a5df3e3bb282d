pub mod booking;
pub mod models;
pub mod repository;
pub mod temperature;

pub use booking::BookingDesk;
pub use models::{
    AlertLevel, BookingStatus, ColdStorageBooking, ColdStorageFacility, FacilityStatus,
    TemperatureLog,
};
pub use temperature::TemperatureMonitor;
