use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{GeoError, GeoPoint};

/// Query string of the nearby shops endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearbyShopsQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(alias = "longitude", alias = "lon")]
    pub lng: f64,
    /// Kilometres; the service default applies when absent
    #[validate(range(exclusive_min = 0.0))]
    #[serde(default)]
    pub radius: Option<f64>,
}

impl NearbyShopsQuery {
    /// Query point; also rejects NaN, which range validation lets through
    pub fn center(&self) -> Result<GeoPoint, GeoError> {
        GeoPoint::new(self.lat, self.lng)
    }

    pub fn has_finite_radius(&self) -> bool {
        self.radius.map_or(true, f64::is_finite)
    }
}
