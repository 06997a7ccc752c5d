use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod buffer;
pub mod clock;
pub mod generator;
pub mod shared;

pub use buffer::{SlidingWindowBuffer, WindowSnapshot, DEFAULT_CAPACITY};
pub use clock::{SampleClock, SystemClock, WallClock, DEFAULT_GENERATION_STEP_MS};
pub use generator::SignalGenerator;
pub use shared::SharedWindow;

pub const TICKS_PER_MILLISECOND: i64 = 10_000;
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Ticks between 0001-01-01T00:00:00 and the Unix epoch.
const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("date {0} is outside the representable tick range")]
    OutOfRange(DateTime<Utc>),
}

/// Point in time counted in 100 ns ticks since 0001-01-01T00:00:00 UTC.
///
/// Tick zero doubles as the "no data yet" marker used for window slots that
/// have never been written.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const UNFILLED: Timestamp = Timestamp(0);

    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    pub const fn ticks(self) -> i64 {
        self.0
    }

    pub fn is_unfilled(self) -> bool {
        self == Self::UNFILLED
    }

    /// Current system time. Falls back to the unfilled marker if the system
    /// clock reports a date outside the tick range.
    pub fn now() -> Self {
        Self::try_from(Utc::now()).unwrap_or(Self::UNFILLED)
    }

    pub fn add_millis(self, millis: i64) -> Self {
        Self(
            self.0
                .saturating_add(millis.saturating_mul(TICKS_PER_MILLISECOND)),
        )
    }

    /// Like [`Timestamp::add_millis`] but `None` instead of saturating.
    pub fn checked_add_millis(self, millis: i64) -> Option<Self> {
        millis
            .checked_mul(TICKS_PER_MILLISECOND)
            .and_then(|ticks| self.0.checked_add(ticks))
            .map(Self)
    }

    pub fn millis_since(self, earlier: Timestamp) -> i64 {
        self.0.saturating_sub(earlier.0) / TICKS_PER_MILLISECOND
    }

    pub fn as_seconds(self) -> f64 {
        self.0 as f64 / TICKS_PER_SECOND as f64
    }

    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        let since_unix = self.0.checked_sub(UNIX_EPOCH_TICKS)?;
        let secs = since_unix.div_euclid(TICKS_PER_SECOND);
        let nanos = (since_unix.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
        DateTime::<Utc>::from_timestamp(secs, nanos)
    }
}

impl TryFrom<DateTime<Utc>> for Timestamp {
    type Error = TimestampError;

    fn try_from(value: DateTime<Utc>) -> Result<Self, Self::Error> {
        let sub_ticks = i64::from(value.timestamp_subsec_nanos() / 100);
        value
            .timestamp()
            .checked_mul(TICKS_PER_SECOND)
            .and_then(|ticks| ticks.checked_add(sub_ticks))
            .and_then(|ticks| ticks.checked_add(UNIX_EPOCH_TICKS))
            .map(Timestamp)
            .ok_or(TimestampError::OutOfRange(value))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) if !self.is_unfilled() => write!(f, "{}", dt.format("%H:%M:%S%.3f")),
            _ => f.write_str("--:--:--"),
        }
    }
}

/// The three simulated signals. They share one index space in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesId {
    A,
    B,
    C,
}

impl SeriesId {
    pub const ALL: [SeriesId; 3] = [SeriesId::A, SeriesId::B, SeriesId::C];

    pub fn index(self) -> usize {
        match self {
            SeriesId::A => 0,
            SeriesId::B => 1,
            SeriesId::C => 2,
        }
    }
}

/// One generated (timestamp, A, B, C) tuple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: Timestamp,
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Sample {
    pub const UNFILLED: Sample = Sample {
        timestamp: Timestamp::UNFILLED,
        a: 0.0,
        b: 0.0,
        c: 0.0,
    };

    pub fn value(&self, series: SeriesId) -> f64 {
        match series {
            SeriesId::A => self.a,
            SeriesId::B => self.b,
            SeriesId::C => self.c,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn unix_epoch_maps_to_known_tick_count() {
        let epoch = Utc.timestamp_opt(0, 0).unwrap();
        let ts = Timestamp::try_from(epoch).unwrap();
        assert_eq!(ts.ticks(), UNIX_EPOCH_TICKS);
        assert_eq!(ts.to_datetime(), Some(epoch));
    }

    #[test]
    fn datetime_conversion_keeps_sub_second_ticks() {
        let dt = Utc.with_ymd_and_hms(2024, 5, 17, 12, 30, 15).unwrap()
            + chrono::Duration::microseconds(250_300);
        let ts = Timestamp::try_from(dt).unwrap();
        assert_eq!(ts.to_datetime(), Some(dt));
        assert_eq!(ts.ticks() % TICKS_PER_SECOND, 2_503_000);
    }

    #[test]
    fn millis_arithmetic() {
        let start = Timestamp::from_ticks(1_000 * TICKS_PER_SECOND);
        let later = start.add_millis(250);
        assert_eq!(later.ticks() - start.ticks(), 2_500_000);
        assert_eq!(later.millis_since(start), 250);
        assert_eq!(start.checked_add_millis(250), Some(later));
        assert_eq!(start.checked_add_millis(i64::MAX), None);
        assert_eq!(Timestamp::from_ticks(i64::MAX - 1).checked_add_millis(1), None);
    }

    #[test]
    fn unfilled_displays_placeholder() {
        assert_eq!(Timestamp::UNFILLED.to_string(), "--:--:--");
        assert!(Timestamp::default().is_unfilled());
    }
}
