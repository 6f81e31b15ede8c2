use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when building a [`GeoPoint`] from untrusted coordinates
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A point on the Earth's surface in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Build a point, rejecting out-of-range or NaN coordinates
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }

        Ok(Self { latitude, longitude })
    }

    /// Build a point without range checks
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(point: GeoPoint) -> Self {
        geo::Point::new(point.longitude, point.latitude)
    }
}

/// Latitude/longitude envelope, x = longitude and y = latitude
pub type BoundingBox = geo::Rect<f64>;

/// Shop address row as stored
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopAddress {
    pub city: Option<String>,
    pub area: Option<String>,
    pub pincode: Option<String>,
    pub landmark: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// One opening-hours row as stored; day and times are free text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopTiming {
    pub day: String,
    pub open_time: String,
    pub close_time: String,
}

/// Shop as returned by the persistence layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopRecord {
    pub shop_id: i64,
    pub shop_name: Option<String>,
    pub shop_image: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub address: Option<ShopAddress>,
    #[serde(default)]
    pub timings: Vec<ShopTiming>,
}

/// A single opening window. `close < open` means the window runs past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayInterval {
    pub day: Weekday,
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl DayInterval {
    #[inline]
    pub fn is_overnight(&self) -> bool {
        self.close < self.open
    }
}

/// Weekly opening hours. Multiple intervals per day are allowed and may overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    intervals: Vec<DayInterval>,
}

impl WeeklySchedule {
    pub fn new(intervals: Vec<DayInterval>) -> Self {
        Self { intervals }
    }

    pub fn intervals(&self) -> &[DayInterval] {
        &self.intervals
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

/// Day of week and wall-clock time at which open status is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    pub weekday: Weekday,
    pub time: NaiveTime,
}

/// Query-time projection of a shop used by the proximity pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct ShopLocation {
    pub shop_id: i64,
    pub location: Option<GeoPoint>,
    pub schedule: WeeklySchedule,
}

/// One entry of a nearby-shops result
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProximityResult {
    pub shop_id: i64,
    /// Kilometres, rounded to 2 decimals
    pub distance_km: f64,
    pub is_open: bool,
    pub location: GeoPoint,
}
