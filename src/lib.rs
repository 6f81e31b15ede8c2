//! NearBuy Locator - nearby shop lookup for the NearBuy local shop directory
//!
//! Given a user's position and a search radius, the locator filters the shop
//! catalog to shops within range, ranks them by great-circle distance and
//! reports whether each one is open right now.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{find_nearby, haversine_distance, is_open, NearbySearch};
pub use crate::models::{ClockReading, GeoPoint, ProximityResult, ShopLocation, ShopRecord, WeeklySchedule};
