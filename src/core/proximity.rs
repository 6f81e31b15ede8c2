use crate::models::{ClockReading, GeoPoint, ProximityResult, ShopLocation, ShopRecord, WeeklySchedule};
use crate::core::{
    distance::{calculate_bounding_box, haversine_distance, is_within_bounding_box, round_distance_km},
    schedule::is_open,
};

/// Radius used when a request does not name one
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Upper bound applied to requested radii
pub const MAX_RADIUS_KM: f64 = 50.0;

impl ShopLocation {
    /// Project a stored shop onto the fields the proximity pipeline needs
    ///
    /// Never fails. Bad coordinates leave the shop without a location and a
    /// bad schedule leaves it permanently closed; both are logged.
    pub fn from_record(record: &ShopRecord) -> Self {
        let location = record.address.as_ref().and_then(|address| {
            match (address.latitude, address.longitude) {
                (Some(lat), Some(lon)) => match GeoPoint::new(lat, lon) {
                    Ok(point) => Some(point),
                    Err(e) => {
                        tracing::warn!("Shop {} has unusable coordinates: {}", record.shop_id, e);
                        None
                    }
                },
                (None, None) => None,
                _ => {
                    tracing::warn!("Shop {} has only one of latitude/longitude", record.shop_id);
                    None
                }
            }
        });

        let schedule = WeeklySchedule::from_timings(&record.timings).unwrap_or_else(|e| {
            tracing::warn!(
                "Shop {} has a malformed schedule, reporting it closed: {}",
                record.shop_id,
                e
            );
            WeeklySchedule::default()
        });

        Self {
            shop_id: record.shop_id,
            location,
            schedule,
        }
    }
}

/// Find shops within `radius_km` of `center`, nearest first
///
/// # Pipeline Stages
/// 1. Drop shops without a location
/// 2. Bounding box rejection (skipped near poles and the antimeridian)
/// 3. Exact Haversine distance against the radius
/// 4. Open status at `now`
/// 5. Stable sort by distance
///
/// A radius that is not strictly positive yields an empty result.
pub fn find_nearby(
    center: GeoPoint,
    radius_km: f64,
    candidates: &[ShopLocation],
    now: ClockReading,
) -> Vec<ProximityResult> {
    if !(radius_km > 0.0) {
        return Vec::new();
    }

    let bounding_box = calculate_bounding_box(center, radius_km);

    let mut nearby: Vec<(f64, ProximityResult)> = candidates
        .iter()
        // Stage 1: shops with an address on file
        .filter_map(|shop| shop.location.map(|location| (shop, location)))
        // Stage 2: cheap rectangle check
        .filter(|(_, location)| {
            bounding_box
                .as_ref()
                .map_or(true, |bbox| is_within_bounding_box(*location, bbox))
        })
        // Stage 3 & 4: exact distance, then open status
        .filter_map(|(shop, location)| {
            let distance_km = haversine_distance(center, location);

            // Written this way so a NaN distance is rejected
            if !(distance_km <= radius_km) {
                return None;
            }

            Some((
                distance_km,
                ProximityResult {
                    shop_id: shop.shop_id,
                    distance_km: round_distance_km(distance_km),
                    is_open: is_open(&shop.schedule, now),
                    location,
                },
            ))
        })
        .collect();

    // Stage 5: unrounded distance keeps near-ties in true order; equal
    // distances keep input order
    nearby.sort_by(|a, b| a.0.total_cmp(&b.0));

    nearby.into_iter().map(|(_, result)| result).collect()
}

/// Result of a nearby search
#[derive(Debug)]
pub struct NearbyResult {
    pub shops: Vec<ProximityResult>,
    pub radius_km: f64,
    pub total_candidates: usize,
}

/// Nearby search with the service's radius policy applied
#[derive(Debug, Clone, Copy)]
pub struct NearbySearch {
    default_radius_km: f64,
    max_radius_km: f64,
}

impl NearbySearch {
    pub fn new(default_radius_km: f64, max_radius_km: f64) -> Self {
        Self {
            default_radius_km,
            max_radius_km,
        }
    }

    pub fn with_default_radius() -> Self {
        Self::new(DEFAULT_RADIUS_KM, MAX_RADIUS_KM)
    }

    pub fn default_radius_km(&self) -> f64 {
        self.default_radius_km
    }

    pub fn max_radius_km(&self) -> f64 {
        self.max_radius_km
    }

    /// Apply the default to a missing radius and cap oversized ones
    ///
    /// NaN and non-positive radii pass through unchanged, so the search
    /// comes back empty.
    pub fn resolve_radius(&self, requested: Option<f64>) -> f64 {
        match requested {
            Some(radius_km) if radius_km.is_nan() => radius_km,
            Some(radius_km) => radius_km.min(self.max_radius_km),
            None => self.default_radius_km,
        }
    }

    /// Run the proximity query over stored shop records
    pub fn search(
        &self,
        center: GeoPoint,
        requested_radius_km: Option<f64>,
        records: &[ShopRecord],
        now: ClockReading,
    ) -> NearbyResult {
        let radius_km = self.resolve_radius(requested_radius_km);
        let candidates: Vec<ShopLocation> = records.iter().map(ShopLocation::from_record).collect();

        let shops = find_nearby(center, radius_km, &candidates, now);

        tracing::debug!(
            "{} of {} shops within {} km of ({}, {})",
            shops.len(),
            records.len(),
            radius_km,
            center.latitude(),
            center.longitude()
        );

        NearbyResult {
            shops,
            radius_km,
            total_candidates: records.len(),
        }
    }
}

impl Default for NearbySearch {
    fn default() -> Self {
        Self::with_default_radius()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayInterval, ShopAddress, ShopTiming};
    use chrono::{NaiveTime, Weekday};

    // Connaught Place, New Delhi
    const CENTER: GeoPoint = GeoPoint::new_unchecked(28.6315, 77.2167);

    fn noon_monday() -> ClockReading {
        ClockReading::new(Weekday::Mon, NaiveTime::from_hms_opt(12, 0, 0).unwrap())
    }

    fn weekday_hours() -> WeeklySchedule {
        WeeklySchedule::new(vec![DayInterval {
            day: Weekday::Mon,
            open: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            close: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        }])
    }

    fn create_shop(id: i64, lat: f64, lon: f64) -> ShopLocation {
        ShopLocation {
            shop_id: id,
            location: Some(GeoPoint::new_unchecked(lat, lon)),
            schedule: weekday_hours(),
        }
    }

    fn create_record(id: i64, coords: Option<(f64, f64)>, timings: Vec<ShopTiming>) -> ShopRecord {
        ShopRecord {
            shop_id: id,
            shop_name: Some(format!("Shop {}", id)),
            shop_image: None,
            created_at: None,
            address: coords.map(|(lat, lon)| ShopAddress {
                city: Some("New Delhi".to_string()),
                latitude: Some(lat),
                longitude: Some(lon),
                ..Default::default()
            }),
            timings,
        }
    }

    #[test]
    fn test_find_nearby_filters_and_sorts() {
        let candidates = vec![
            create_shop(1, 28.6500, 77.2300), // ~2.4 km
            create_shop(2, 28.6320, 77.2170), // ~0.06 km
            create_shop(3, 28.4595, 77.0266), // Gurugram, ~27 km
            create_shop(4, 28.6139, 77.2090), // ~2.1 km
        ];

        let result = find_nearby(CENTER, 10.0, &candidates, noon_monday());

        let ids: Vec<i64> = result.iter().map(|r| r.shop_id).collect();
        assert_eq!(ids, vec![2, 4, 1]);
        assert!(result.iter().all(|r| r.is_open));
        assert!(result.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
    }

    #[test]
    fn test_shops_without_location_never_returned() {
        let mut homeless = create_shop(9, 0.0, 0.0);
        homeless.location = None;
        let candidates = vec![homeless, create_shop(1, 28.6320, 77.2170)];

        for radius in [0.5, 10.0, 20_000.0] {
            let result = find_nearby(CENTER, radius, &candidates, noon_monday());
            assert!(result.iter().all(|r| r.shop_id != 9));
        }
    }

    #[test]
    fn test_zero_and_negative_radius_is_empty() {
        let candidates = vec![create_shop(1, CENTER.latitude(), CENTER.longitude())];

        assert!(find_nearby(CENTER, 0.0, &candidates, noon_monday()).is_empty());
        assert!(find_nearby(CENTER, -5.0, &candidates, noon_monday()).is_empty());
        assert!(find_nearby(CENTER, f64::NAN, &candidates, noon_monday()).is_empty());
    }

    #[test]
    fn test_empty_candidates() {
        assert!(find_nearby(CENTER, 10.0, &[], noon_monday()).is_empty());
    }

    #[test]
    fn test_equal_distances_keep_input_order() {
        let candidates = vec![
            create_shop(7, 28.6400, 77.2167),
            create_shop(3, 28.6400, 77.2167),
            create_shop(5, 28.6400, 77.2167),
        ];

        let result = find_nearby(CENTER, 5.0, &candidates, noon_monday());
        let ids: Vec<i64> = result.iter().map(|r| r.shop_id).collect();
        assert_eq!(ids, vec![7, 3, 5]);
    }

    #[test]
    fn test_distance_rounded_to_two_decimals() {
        let candidates = vec![create_shop(1, 28.6500, 77.2300)];
        let result = find_nearby(CENTER, 10.0, &candidates, noon_monday());

        let d = result[0].distance_km;
        assert_eq!(d, (d * 100.0).round() / 100.0);
    }

    #[test]
    fn test_closed_outside_hours() {
        let candidates = vec![create_shop(1, 28.6320, 77.2170)];
        let evening = ClockReading::new(Weekday::Mon, NaiveTime::from_hms_opt(19, 0, 0).unwrap());

        let result = find_nearby(CENTER, 10.0, &candidates, evening);
        assert_eq!(result.len(), 1);
        assert!(!result[0].is_open);
    }

    #[test]
    fn test_search_across_antimeridian() {
        let center = GeoPoint::new_unchecked(-17.0, 179.99);
        let candidates = vec![
            create_shop(1, -17.0, -179.99), // just across the line, ~2 km
            create_shop(2, -17.0, 179.0),   // ~105 km
        ];

        let result = find_nearby(center, 10.0, &candidates, noon_monday());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].shop_id, 1);
    }

    #[test]
    fn test_from_record_malformed_schedule_is_closed() {
        let record = create_record(
            1,
            Some((28.6320, 77.2170)),
            vec![ShopTiming {
                day: "Funday".to_string(),
                open_time: "09:00".to_string(),
                close_time: "18:00".to_string(),
            }],
        );

        let shop = ShopLocation::from_record(&record);
        assert!(shop.location.is_some());
        assert!(shop.schedule.is_empty());
    }

    #[test]
    fn test_from_record_bad_coordinates() {
        let out_of_range = create_record(1, Some((128.0, 77.0)), vec![]);
        assert!(ShopLocation::from_record(&out_of_range).location.is_none());

        let mut half = create_record(2, Some((28.6, 77.2)), vec![]);
        half.address.as_mut().unwrap().longitude = None;
        assert!(ShopLocation::from_record(&half).location.is_none());

        let no_address = create_record(3, None, vec![]);
        assert!(ShopLocation::from_record(&no_address).location.is_none());
    }

    #[test]
    fn test_resolve_radius() {
        let search = NearbySearch::new(10.0, 50.0);

        assert_eq!(search.resolve_radius(None), 10.0);
        assert_eq!(search.resolve_radius(Some(3.5)), 3.5);
        assert_eq!(search.resolve_radius(Some(500.0)), 50.0);
        assert_eq!(search.resolve_radius(Some(-2.0)), -2.0);
        assert!(search.resolve_radius(Some(f64::NAN)).is_nan());
    }

    #[test]
    fn test_search_with_unusable_radius_is_empty() {
        // Gurugram, ~26 km from the centre
        let far = create_record(1, Some((28.4595, 77.0266)), vec![]);
        let near = create_record(2, Some((28.6320, 77.2170)), vec![]);
        let records = [far, near];
        let search = NearbySearch::default();

        for radius in [f64::NAN, 0.0, -1.0] {
            let result = search.search(CENTER, Some(radius), &records, noon_monday());
            assert!(result.shops.is_empty(), "radius {} returned shops", radius);
            assert_eq!(result.total_candidates, 2);
        }
    }

    #[test]
    fn test_search_keeps_batch_on_bad_record() {
        let good = create_record(
            1,
            Some((28.6320, 77.2170)),
            vec![ShopTiming {
                day: "Monday".to_string(),
                open_time: "09:00:00".to_string(),
                close_time: "18:00:00".to_string(),
            }],
        );
        let bad = create_record(
            2,
            Some((28.6400, 77.2167)),
            vec![ShopTiming {
                day: "Monday".to_string(),
                open_time: "nine".to_string(),
                close_time: "18:00:00".to_string(),
            }],
        );

        let result = NearbySearch::default().search(CENTER, None, &[good, bad], noon_monday());

        assert_eq!(result.total_candidates, 2);
        assert_eq!(result.radius_km, DEFAULT_RADIUS_KM);
        assert_eq!(result.shops.len(), 2);
        assert!(result.shops[0].is_open);
        assert!(!result.shops[1].is_open);
    }
}
