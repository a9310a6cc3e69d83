//! Naive local time primitives.
//!
//! All interval boundaries in this system are naive local timestamps: the
//! wire format is `YYYY-MM-DDTHH:MM:SS` with no zone designator, and no
//! timezone conversion happens anywhere in the crate. Internally a timestamp
//! is an integer minute count on the same fixed local calendar, so values
//! order exactly as the wire strings do. All parsing and formatting of the
//! wire format lives in this module and nowhere else.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Wire format for timestamps. Seconds are carried for compatibility with
/// stored values but must be zero; the engine is minute-granular.
pub const STAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Wire format for times of day used by recurrence requests.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Errors produced by time parsing and interval construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TimeError {
    #[error("invalid timestamp '{value}': expected YYYY-MM-DDTHH:MM:SS")]
    InvalidTimestamp { value: String },

    #[error("timestamp '{0}' has sub-minute precision")]
    SubMinute(String),

    #[error("invalid time of day '{value}': expected HH:MM or HH:MM:SS")]
    InvalidTimeOfDay { value: String },

    #[error("empty interval: start {start} must precede end {end}")]
    EmptyInterval { start: LocalStamp, end: LocalStamp },
}

/// A naive local timestamp, stored as whole minutes since
/// 1970-01-01T00:00:00 on the local calendar.
///
/// The integer form is directly orderable and cheap to do arithmetic on;
/// conversion to and from the wire string happens only through
/// [`LocalStamp::parse`] and [`LocalStamp::format`].
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct LocalStamp(i64);

impl LocalStamp {
    /// Create from a raw minute count.
    pub fn from_minutes(minutes: i64) -> Self {
        LocalStamp(minutes)
    }

    /// Raw minute count since 1970-01-01T00:00 local.
    pub fn minutes(&self) -> i64 {
        self.0
    }

    /// Parse the naive wire format. Rejects sub-minute precision so that a
    /// stored value always round-trips byte-for-byte.
    pub fn parse(value: &str) -> Result<Self, TimeError> {
        let dt = NaiveDateTime::parse_from_str(value, STAMP_FORMAT).map_err(|_| {
            TimeError::InvalidTimestamp {
                value: value.to_string(),
            }
        })?;
        if dt.second() != 0 || dt.nanosecond() != 0 {
            return Err(TimeError::SubMinute(value.to_string()));
        }
        Ok(Self::from_datetime(dt))
    }

    /// Format as the naive wire format.
    pub fn format(&self) -> String {
        self.to_datetime().format(STAMP_FORMAT).to_string()
    }

    /// Convert from a naive datetime, truncating sub-minute precision.
    ///
    /// `NaiveDateTime::default()` is 1970-01-01T00:00:00, the epoch of the
    /// internal minute count.
    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        let seconds = dt.signed_duration_since(NaiveDateTime::default()).num_seconds();
        LocalStamp(seconds.div_euclid(60))
    }

    /// Convert to a naive datetime on the local calendar.
    pub fn to_datetime(&self) -> NaiveDateTime {
        NaiveDateTime::default() + Duration::minutes(self.0)
    }

    /// Calendar date of this timestamp.
    pub fn date(&self) -> NaiveDate {
        self.to_datetime().date()
    }

    /// Time-of-day component.
    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_minutes(self.0.rem_euclid(1440) as u32)
    }

    /// Combine a date with a time-of-day.
    pub fn from_date_time(date: NaiveDate, time: TimeOfDay) -> Self {
        let midnight = Self::from_datetime(date.and_time(chrono::NaiveTime::default()));
        LocalStamp(midnight.0 + i64::from(time.0))
    }

    /// Shift by a signed number of minutes.
    pub fn plus_minutes(&self, minutes: i64) -> Self {
        LocalStamp(self.0 + minutes)
    }
}

impl std::fmt::Display for LocalStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}

impl TryFrom<String> for LocalStamp {
    type Error = TimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        LocalStamp::parse(&value)
    }
}

impl From<LocalStamp> for String {
    fn from(stamp: LocalStamp) -> Self {
        stamp.format()
    }
}

/// A time of day as minutes from midnight, used by recurrence requests.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    /// Create from minutes after midnight. Values are taken modulo one day.
    pub fn from_minutes(minutes: u32) -> Self {
        TimeOfDay(minutes % 1440)
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    /// Parse `HH:MM` or `HH:MM:SS` (seconds must be zero).
    pub fn parse(value: &str) -> Result<Self, TimeError> {
        let time = chrono::NaiveTime::parse_from_str(value, TIME_FORMAT)
            .or_else(|_| chrono::NaiveTime::parse_from_str(value, "%H:%M"))
            .map_err(|_| TimeError::InvalidTimeOfDay {
                value: value.to_string(),
            })?;
        if time.second() != 0 || time.nanosecond() != 0 {
            return Err(TimeError::SubMinute(value.to_string()));
        }
        Ok(TimeOfDay(time.hour() * 60 + time.minute()))
    }

    pub fn format(&self) -> String {
        format!("{:02}:{:02}:00", self.0 / 60, self.0 % 60)
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TimeOfDay::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.format()
    }
}

/// A half-open `[start, end)` span of naive local time.
///
/// The end instant is excluded, so adjacency is never an overlap. This is the
/// foundation for every other component: windows, bookings, blocks, and
/// computed slots are all carried as `TimeInterval`s.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: LocalStamp,
    pub end: LocalStamp,
}

impl TimeInterval {
    /// Create an interval, enforcing `start < end`.
    pub fn new(start: LocalStamp, end: LocalStamp) -> Result<Self, TimeError> {
        if start >= end {
            return Err(TimeError::EmptyInterval { start, end });
        }
        Ok(TimeInterval { start, end })
    }

    /// Parse both endpoints from the wire format.
    pub fn parse(start: &str, end: &str) -> Result<Self, TimeError> {
        Self::new(LocalStamp::parse(start)?, LocalStamp::parse(end)?)
    }

    /// The single overlap definition for the whole crate: strict half-open
    /// test, touching endpoints never overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `other` lies fully inside this interval.
    pub fn contains(&self, other: &TimeInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Intersection with another interval, `None` when disjoint or touching.
    pub fn intersect(&self, other: &TimeInterval) -> Option<TimeInterval> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        TimeInterval::new(start, end).ok()
    }

    /// Span length in minutes; always positive.
    pub fn duration_minutes(&self) -> i64 {
        self.end.minutes() - self.start.minutes()
    }
}

impl std::fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
