// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BoundingBox, ClockReading, DayInterval, GeoError, GeoPoint, ProximityResult, ShopAddress,
    ShopLocation, ShopRecord, ShopTiming, WeeklySchedule,
};
pub use requests::NearbyShopsQuery;
pub use responses::{
    CatalogRefreshResponse, ErrorResponse, HealthResponse, NearbyAddress, NearbyShop, NearbyShopsResponse, ShopDetail,
    ShopSummary, TimingResponse,
};
