use serde::{Deserialize, Serialize};
use crate::models::domain::{ProximityResult, ShopAddress, ShopRecord, ShopTiming};

/// Address block of a nearby shop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyAddress {
    pub city: Option<String>,
    pub area: Option<String>,
    pub pincode: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// One shop in the nearby shops response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyShop {
    pub shop_id: i64,
    pub shop_name: Option<String>,
    pub shop_image: Option<String>,
    /// Kilometres, 2 decimals
    pub distance: f64,
    pub is_open: bool,
    pub address: NearbyAddress,
}

impl NearbyShop {
    pub fn new(record: &ShopRecord, result: &ProximityResult) -> Self {
        let address = record.address.as_ref();

        Self {
            shop_id: result.shop_id,
            shop_name: record.shop_name.clone(),
            shop_image: record.shop_image.clone(),
            distance: result.distance_km,
            is_open: result.is_open,
            address: NearbyAddress {
                city: address.and_then(|a| a.city.clone()),
                area: address.and_then(|a| a.area.clone()),
                pincode: address.and_then(|a| a.pincode.clone()),
                latitude: result.location.latitude(),
                longitude: result.location.longitude(),
            },
        }
    }
}

/// Response for the nearby shops endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyShopsResponse {
    pub shops: Vec<NearbyShop>,
    pub radius_km: f64,
    pub total_candidates: usize,
}

/// Shop entry of the listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopSummary {
    pub shop_id: i64,
    pub shop_name: Option<String>,
    pub shop_image: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub address: Option<ShopAddress>,
}

impl From<&ShopRecord> for ShopSummary {
    fn from(record: &ShopRecord) -> Self {
        Self {
            shop_id: record.shop_id,
            shop_name: record.shop_name.clone(),
            shop_image: record.shop_image.clone(),
            created_at: record.created_at,
            address: record.address.clone(),
        }
    }
}

/// Opening hours row, times as `HH:MM` when they parse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingResponse {
    pub day: String,
    pub open_time: String,
    pub close_time: String,
}

impl From<&ShopTiming> for TimingResponse {
    fn from(timing: &ShopTiming) -> Self {
        let short = |raw: &str| {
            crate::core::schedule::parse_time_of_day(raw)
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_else(|_| raw.to_string())
        };

        Self {
            day: timing.day.clone(),
            open_time: short(&timing.open_time),
            close_time: short(&timing.close_time),
        }
    }
}

/// Response for the shop detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopDetail {
    pub shop_id: i64,
    pub shop_name: Option<String>,
    pub shop_image: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub address: Option<ShopAddress>,
    pub timings: Vec<TimingResponse>,
    pub is_open: bool,
}

/// Result of reloading the shop catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRefreshResponse {
    pub shop_count: usize,
    pub ttl_secs: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
