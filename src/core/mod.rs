// Core algorithm exports
pub mod distance;
pub mod proximity;
pub mod schedule;

pub use distance::{haversine_distance, calculate_bounding_box, is_within_bounding_box, round_distance_km};
pub use proximity::{find_nearby, NearbyResult, NearbySearch};
pub use schedule::{is_open, ScheduleError};
