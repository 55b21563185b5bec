//! Line timestamps.
//!
//! The remote sends dates as text. Accepted forms:
//! - RFC 3339, e.g. `2024-03-08T20:45:23.123456Z`
//! - ISO 8601 without offset (taken as UTC), e.g. `2024-03-08T20:45:23`
//! - Seconds since the epoch with optional micros, e.g. `1709930723.123456`
//!
//! Anything else reads as the epoch.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt;

/// Seconds and microseconds since the Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    secs: i64,
    micros: u32,
}

impl Timestamp {
    /// The Unix epoch.
    pub const EPOCH: Timestamp = Timestamp { secs: 0, micros: 0 };

    /// Create a timestamp; micros above one second are clamped.
    pub fn new(secs: i64, micros: u32) -> Self {
        Self {
            secs,
            micros: micros.min(999_999),
        }
    }

    /// Whole seconds since the epoch.
    pub fn secs(&self) -> i64 {
        self.secs
    }

    /// Microseconds within the second.
    pub fn micros(&self) -> u32 {
        self.micros
    }

    /// Parse a remote date, falling back to the epoch.
    pub fn parse_or_epoch(date: Option<&str>) -> Self {
        date.and_then(parse_date).unwrap_or(Self::EPOCH)
    }

    fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self::new(dt.timestamp(), dt.timestamp_subsec_micros())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.secs, self.micros)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self)
    }
}

/// Parse a date sent by the remote.
pub fn parse_date(date: &str) -> Option<Timestamp> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(Timestamp::from_datetime(dt.with_timezone(&Utc)));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(date, format) {
            return Some(Timestamp::from_datetime(naive.and_utc()));
        }
    }

    parse_epoch(date)
}

fn parse_epoch(date: &str) -> Option<Timestamp> {
    let (secs, frac) = match date.split_once('.') {
        Some((secs, frac)) => (secs, frac),
        None => (date, ""),
    };
    if secs.is_empty() || !secs.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let secs: i64 = secs.parse().ok()?;
    // Scale the fraction to exactly six digits.
    let micros = frac
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(6)
        .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));

    Some(Timestamp::new(secs, micros))
}
