// Unit tests for the NearBuy locator public API

use chrono::{NaiveTime, Weekday};
use nearbuy_locator::core::{
    distance::{calculate_bounding_box, haversine_distance, is_within_bounding_box},
    schedule::{is_open, parse_weekday},
};
use nearbuy_locator::models::{ClockReading, DayInterval, GeoError, GeoPoint, ShopTiming, WeeklySchedule};

fn at(day: Weekday, hour: u32, minute: u32) -> ClockReading {
    ClockReading::new(day, NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
}

#[test]
fn test_haversine_distance_zero() {
    let points = [
        GeoPoint::new_unchecked(28.6139, 77.2090),
        GeoPoint::new_unchecked(-33.8688, 151.2093),
        GeoPoint::new_unchecked(90.0, 0.0),
        GeoPoint::new_unchecked(0.0, -180.0),
    ];

    for p in points {
        assert!(haversine_distance(p, p).abs() < 1e-9);
    }
}

#[test]
fn test_haversine_distance_symmetric() {
    let pairs = [
        ((28.6139, 77.2090), (19.0760, 72.8777)),
        ((51.5074, -0.1278), (40.7128, -74.0060)),
        ((-89.5, 10.0), (89.5, -170.0)),
    ];

    for ((lat1, lon1), (lat2, lon2)) in pairs {
        let a = GeoPoint::new_unchecked(lat1, lon1);
        let b = GeoPoint::new_unchecked(lat2, lon2);
        assert!((haversine_distance(a, b) - haversine_distance(b, a)).abs() < 1e-9);
    }
}

#[test]
fn test_haversine_distance_delhi_to_mumbai() {
    let delhi = GeoPoint::new_unchecked(28.6139, 77.2090);
    let mumbai = GeoPoint::new_unchecked(19.0760, 72.8777);

    let distance = haversine_distance(delhi, mumbai);
    assert!((distance - 1161.4).abs() < 2.0, "Expected ~1161.4km, got {}", distance);
}

#[test]
fn test_haversine_distance_monotonic_along_meridian() {
    let origin = GeoPoint::new_unchecked(0.0, 77.0);
    let mut previous = 0.0;

    for step in 1..=18 {
        let distance = haversine_distance(origin, GeoPoint::new_unchecked(step as f64 * 5.0, 77.0));
        assert!(distance > previous);
        previous = distance;
    }
}

#[test]
fn test_geo_point_validation() {
    assert!(GeoPoint::new(90.0, 180.0).is_ok());
    assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    assert_eq!(GeoPoint::new(90.5, 0.0), Err(GeoError::LatitudeOutOfRange(90.5)));
    assert_eq!(GeoPoint::new(0.0, -180.5), Err(GeoError::LongitudeOutOfRange(-180.5)));
    assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
}

#[test]
fn test_point_within_bbox() {
    let center = GeoPoint::new_unchecked(19.0760, 72.8777);
    let bbox = calculate_bounding_box(center, 10.0).unwrap();

    assert!(is_within_bounding_box(center, &bbox));
    assert!(is_within_bounding_box(GeoPoint::new_unchecked(19.10, 72.90), &bbox));
    assert!(!is_within_bounding_box(GeoPoint::new_unchecked(28.6139, 77.2090), &bbox));

    // Point just outside latitude is not within
    let north = GeoPoint::new_unchecked(bbox.max().y + 0.01, 72.8777);
    assert!(!is_within_bounding_box(north, &bbox));
}

#[test]
fn test_is_open_monday_fixture() {
    let schedule = WeeklySchedule::new(vec![DayInterval {
        day: Weekday::Mon,
        open: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        close: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
    }]);

    assert!(is_open(&schedule, at(Weekday::Mon, 12, 0)));
    assert!(!is_open(&schedule, at(Weekday::Mon, 19, 0)));
    assert!(!is_open(&schedule, at(Weekday::Tue, 12, 0)));
}

#[test]
fn test_stored_day_names_normalised() {
    let timings: Vec<ShopTiming> = ["MONDAY", "monday", "Monday", "mon"]
        .iter()
        .map(|day| ShopTiming {
            day: day.to_string(),
            open_time: "10:00".to_string(),
            close_time: "11:00".to_string(),
        })
        .collect();

    let schedule = WeeklySchedule::from_timings(&timings).unwrap();
    assert!(schedule.intervals().iter().all(|i| i.day == Weekday::Mon));
    assert_eq!(parse_weekday("Saturday"), Ok(Weekday::Sat));
}
