//! Clock arithmetic on "HH:MM" times with 24-hour wrap-around.
//!
//! A shift that ends at a numerically earlier time than it starts spans
//! midnight (e.g. a night shift 16:00 → 09:00). All spans are computed in
//! whole minutes so the legal break-time boundaries (6h00/6h01/8h00/8h01)
//! stay exact.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("invalid clock time (expected HH:MM): {0}")]
    InvalidClockTime(String),
}

/// Wall-clock time of day, stored as minutes from midnight (0..1440).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u32);

impl ClockTime {
    pub fn from_hm(hours: u32, minutes: u32) -> Result<Self, TimeError> {
        if hours > 23 || minutes > 59 {
            return Err(TimeError::InvalidClockTime(format!("{hours:02}:{minutes:02}")));
        }
        Ok(Self(hours * 60 + minutes))
    }

    pub fn minutes_from_midnight(self) -> u32 {
        self.0
    }
}

impl FromStr for ClockTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || TimeError::InvalidClockTime(s.to_string());
        let (h, m) = s.split_once(':').ok_or_else(bad)?;
        if h.is_empty() || m.is_empty() {
            return Err(bad());
        }
        let hours: u32 = h.parse().map_err(|_| bad())?;
        let minutes: u32 = m.parse().map_err(|_| bad())?;
        Self::from_hm(hours, minutes).map_err(|_| bad())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ClockTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ClockTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Gross span between `start` and `end` in minutes, wrapping past midnight.
/// `start == end` yields 0; callers that mean a full 24h day must say so
/// via [`full_day_span_minutes`].
pub fn span_minutes(start: ClockTime, end: ClockTime) -> u32 {
    if end.0 < start.0 {
        MINUTES_PER_DAY - start.0 + end.0
    } else {
        end.0 - start.0
    }
}

/// Like [`span_minutes`] but an equal start/end counts as a full day.
pub fn full_day_span_minutes(start: ClockTime, end: ClockTime) -> u32 {
    match span_minutes(start, end) {
        0 => MINUTES_PER_DAY,
        n => n,
    }
}

/// Gross span in hours (fractional).
pub fn span_hours(start: ClockTime, end: ClockTime) -> f64 {
    f64::from(span_minutes(start, end)) / 60.0
}

/// Net working hours: gross span minus the configured break, floored at 0.
pub fn net_work_hours(start: ClockTime, end: ClockTime, rest_hours: f64) -> f64 {
    (span_hours(start, end) - rest_hours).max(0.0)
}

/// Off-duty gap between the end of one shift and the start of the next, in
/// minutes. A previous end later than the next start means the earlier shift
/// ran past midnight (night shift ending next morning), so the gap wraps.
pub fn interval_minutes(prev_end: ClockTime, next_start: ClockTime) -> u32 {
    if prev_end.0 > next_start.0 {
        MINUTES_PER_DAY - prev_end.0 + next_start.0
    } else {
        next_start.0 - prev_end.0
    }
}

pub fn interval_hours(prev_end: ClockTime, next_start: ClockTime) -> f64 {
    f64::from(interval_minutes(prev_end, next_start)) / 60.0
}
