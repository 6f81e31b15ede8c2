use crate::models::{BoundingBox, GeoPoint};
use geo::coord;

/// Earth's mean radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Relative widening applied to bounding boxes so floating-point noise
/// never rejects a point that lies exactly on the search circle
const BBOX_MARGIN: f64 = 1e-6;

/// Calculate the Haversine distance between two points in kilometers
///
/// No range validation is done here; NaN inputs yield NaN.
///
/// # Arguments
/// * `a` - First point, degrees
/// * `b` - Second point, degrees
///
/// # Returns
/// Great-circle distance in kilometers on a sphere of radius `EARTH_RADIUS_KM`
#[inline]
pub fn haversine_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1_rad = a.latitude().to_radians();
    let lat2_rad = b.latitude().to_radians();
    let delta_lat = lat2_rad - lat1_rad;
    let delta_lon = (b.longitude() - a.longitude()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Round a distance to 2 decimal places, ties to even
///
/// `0.125` becomes `0.12` and `0.375` becomes `0.38`.
#[inline]
pub fn round_distance_km(distance_km: f64) -> f64 {
    (distance_km * 100.0).round_ties_even() / 100.0
}

/// Calculate the latitude/longitude envelope of a search circle
///
/// Returns `None` when no useful rectangle exists: the circle reaches a
/// pole, crosses the antimeridian, or the radius is not a positive number.
/// Callers must then fall back to checking every point.
///
/// # Arguments
/// * `center` - Center of the search circle
/// * `radius_km` - Radius in kilometers
///
/// # Returns
/// Rectangle with `x` as longitude and `y` as latitude in degrees, or `None`
pub fn calculate_bounding_box(center: GeoPoint, radius_km: f64) -> Option<BoundingBox> {
    if !(radius_km > 0.0) || !center.latitude().is_finite() || !center.longitude().is_finite() {
        return None;
    }

    // Angular radius of the circle
    let angular = radius_km / EARTH_RADIUS_KM * (1.0 + BBOX_MARGIN);
    let lat = center.latitude().to_radians();

    let min_lat = lat - angular;
    let max_lat = lat + angular;
    if max_lat >= std::f64::consts::FRAC_PI_2 || min_lat <= -std::f64::consts::FRAC_PI_2 {
        return None;
    }

    // Widest longitude offset reached by the circle
    let lon_delta = (angular.sin() / lat.cos()).asin();
    let lon = center.longitude().to_radians();
    let min_lon = lon - lon_delta;
    let max_lon = lon + lon_delta;
    if min_lon < -std::f64::consts::PI || max_lon > std::f64::consts::PI {
        return None;
    }

    Some(BoundingBox::new(
        coord! { x: min_lon.to_degrees(), y: min_lat.to_degrees() },
        coord! { x: max_lon.to_degrees(), y: max_lat.to_degrees() },
    ))
}

/// Check if a point is within a bounding box, edges included
#[inline]
pub fn is_within_bounding_box(point: GeoPoint, bbox: &BoundingBox) -> bool {
    let (min, max) = (bbox.min(), bbox.max());

    point.latitude() >= min.y
        && point.latitude() <= max.y
        && point.longitude() >= min.x
        && point.longitude() <= max.x
}
