//! Snapshot and expiry instants.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds in the 365-day year used for time to expiry.
pub const SECONDS_PER_YEAR: f64 = 365.0 * 86_400.0;

/// A UTC instant: when a chain was observed, or when a contract stops trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Wrap a UTC datetime.
    #[must_use]
    pub const fn new(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Current time.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parse an RFC 3339 string, converting any offset to UTC.
    ///
    /// # Errors
    ///
    /// Returns error if the string is not a valid RFC 3339 timestamp.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        let dt = DateTime::parse_from_rfc3339(s)?;
        Ok(Self(dt.with_timezone(&Utc)))
    }

    /// Close of trading on `date`, at `hour_utc:00` UTC.
    ///
    /// Hours past 23 are clamped to 23.
    #[must_use]
    pub fn market_close(date: NaiveDate, hour_utc: u32) -> Self {
        let time = NaiveTime::from_hms_opt(hour_utc.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
        Self(Utc.from_utc_datetime(&date.and_time(time)))
    }

    /// Inner datetime.
    #[must_use]
    pub const fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// RFC 3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Signed duration from `other` to `self`.
    #[must_use]
    pub fn duration_since(&self, other: Self) -> chrono::Duration {
        self.0 - other.0
    }

    /// Signed years (365-day) from `self` until `later`, millisecond precision.
    ///
    /// Negative when `later` is in the past.
    #[must_use]
    pub fn years_until(&self, later: Self) -> f64 {
        later.duration_since(*self).num_milliseconds() as f64 / 1_000.0 / SECONDS_PER_YEAR
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_offset() {
        let ts = Timestamp::parse("2026-01-19T07:00:00-05:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-01-19T12:00:00+00:00");
        assert!(Timestamp::parse("not-a-date").is_err());
    }

    #[test]
    fn market_close_uses_configured_hour() {
        let close = Timestamp::market_close(NaiveDate::from_ymd_opt(2026, 2, 20).unwrap(), 20);
        assert_eq!(close, Timestamp::parse("2026-02-20T20:00:00Z").unwrap());

        let clamped = Timestamp::market_close(NaiveDate::from_ymd_opt(2026, 2, 20).unwrap(), 99);
        assert_eq!(clamped, Timestamp::parse("2026-02-20T23:00:00Z").unwrap());
    }

    #[test]
    fn years_until_is_signed() {
        let a = Timestamp::parse("2026-01-01T00:00:00Z").unwrap();
        let b = Timestamp::parse("2027-01-01T00:00:00Z").unwrap();
        assert!((a.years_until(b) - 1.0).abs() < 1e-12);
        assert!((b.years_until(a) + 1.0).abs() < 1e-12);
        assert_eq!(b.duration_since(a).num_days(), 365);
    }

    #[test]
    fn serializes_as_rfc3339_string() {
        let ts = Timestamp::parse("2026-01-19T12:00:00Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.starts_with("\"2026-01-19T12:00:00"));
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ts);
    }
}
