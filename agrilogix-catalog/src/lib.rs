pub mod farm;
pub mod listing;
pub mod market;
pub mod product;
pub mod repository;

pub use farm::{Farm, FarmType, FarmerProfile};
pub use listing::ListingManager;
pub use market::{MarketPriceIndex, PriceTracker};
pub use product::{Product, ProductCategory, ProductStatus, Unit};
