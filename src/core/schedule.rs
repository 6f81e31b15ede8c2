use crate::models::{ClockReading, DayInterval, ShopTiming, WeeklySchedule};
use chrono::{DateTime, Datelike, NaiveTime, TimeZone, Timelike, Weekday};
use thiserror::Error;

/// Errors that can occur while reading stored opening hours
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Unknown day name: {0:?}")]
    InvalidDay(String),

    #[error("Invalid time of day: {0:?}")]
    InvalidTime(String),
}

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];

/// Parse a stored day name. Full names and three-letter abbreviations are
/// accepted in any case.
pub fn parse_weekday(raw: &str) -> Result<Weekday, ScheduleError> {
    raw.trim()
        .parse::<Weekday>()
        .map_err(|_| ScheduleError::InvalidDay(raw.to_string()))
}

/// Parse a stored time of day (`HH:MM` or `HH:MM:SS`)
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, ScheduleError> {
    let trimmed = raw.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| ScheduleError::InvalidTime(raw.to_string()))
}

impl TryFrom<&ShopTiming> for DayInterval {
    type Error = ScheduleError;

    fn try_from(timing: &ShopTiming) -> Result<Self, Self::Error> {
        Ok(DayInterval {
            day: parse_weekday(&timing.day)?,
            open: parse_time_of_day(&timing.open_time)?,
            close: parse_time_of_day(&timing.close_time)?,
        })
    }
}

impl WeeklySchedule {
    /// Build a schedule from stored timing rows; the first bad row fails the whole schedule
    pub fn from_timings(timings: &[ShopTiming]) -> Result<Self, ScheduleError> {
        timings
            .iter()
            .map(DayInterval::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map(WeeklySchedule::new)
    }
}

impl ClockReading {
    pub fn new(weekday: Weekday, time: NaiveTime) -> Self {
        Self { weekday, time }
    }

    /// Reading of a zoned instant in that zone's wall-clock time
    pub fn from_datetime<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        let local = instant.naive_local();
        let time = NaiveTime::from_hms_opt(local.hour(), local.minute(), local.second())
            .unwrap_or(NaiveTime::MIN);

        Self {
            weekday: local.weekday(),
            time,
        }
    }
}

/// Check whether one interval covers the clock reading
///
/// Both bounds are inclusive. An interval whose close time is before its
/// open time wraps past midnight into the following day.
#[inline]
pub fn interval_contains(interval: &DayInterval, now: ClockReading) -> bool {
    if interval.is_overnight() {
        (now.weekday == interval.day && now.time >= interval.open)
            || (now.weekday == interval.day.succ() && now.time <= interval.close)
    } else {
        now.weekday == interval.day && interval.open <= now.time && now.time <= interval.close
    }
}

/// Check whether a shop is open at the given reading
#[inline]
pub fn is_open(schedule: &WeeklySchedule, now: ClockReading) -> bool {
    schedule
        .intervals()
        .iter()
        .any(|interval| interval_contains(interval, now))
}
