//! ISO-8601 timestamps for signed HandCash requests.
//!
//! The server rebuilds the signed payload from the `oauth-timestamp` header
//! verbatim, so the rendering here must match JavaScript's
//! `Date.prototype.toISOString()` exactly: UTC, three fractional digits and a
//! literal `Z` suffix.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A UTC instant with millisecond precision.
///
/// Rendered as `YYYY-MM-DDTHH:mm:ss.sssZ`:
///
/// ```rust
/// use handcash::timestamp::IsoTimestamp;
///
/// let ts = IsoTimestamp::from_millis(1_606_062_683_304).unwrap();
/// assert_eq!(ts.to_string(), "2020-11-22T16:31:23.304Z");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoTimestamp(DateTime<Utc>);

impl IsoTimestamp {
    /// Returns the current wall-clock time, truncated to milliseconds.
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Wraps a [`DateTime`], dropping any sub-millisecond precision.
    #[must_use]
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime.trunc_subsecs(3))
    }

    /// Creates a timestamp from milliseconds since the Unix epoch.
    ///
    /// Returns `None` if the value is outside the representable range.
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self)
    }

    /// Returns milliseconds since the Unix epoch.
    #[must_use]
    pub fn as_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Returns the underlying [`DateTime`].
    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl Display for IsoTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S%.3fZ"))
    }
}

impl FromStr for IsoTimestamp {
    type Err = chrono::ParseError;

    /// Parses any RFC 3339 timestamp and converts it to UTC.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = DateTime::parse_from_rfc3339(s.trim())?;
        Ok(Self::from_datetime(parsed.with_timezone(&Utc)))
    }
}

impl From<DateTime<Utc>> for IsoTimestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::from_datetime(datetime)
    }
}

impl Serialize for IsoTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IsoTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_display_matches_javascript_iso_string() {
        let ts: IsoTimestamp = "2020-11-22T16:31:23.304Z".parse().unwrap();
        assert_eq!(ts.to_string(), "2020-11-22T16:31:23.304Z");
    }

    #[test]
    fn test_display_keeps_trailing_zero_millis() {
        let dt = Utc.with_ymd_and_hms(2021, 1, 2, 3, 4, 5).unwrap();
        let ts = IsoTimestamp::from_datetime(dt);
        assert_eq!(ts.to_string(), "2021-01-02T03:04:05.000Z");
    }

    #[test]
    fn test_parse_truncates_sub_millisecond_precision() {
        let ts: IsoTimestamp = "2020-11-22T16:31:23.304999Z".parse().unwrap();
        assert_eq!(ts.to_string(), "2020-11-22T16:31:23.304Z");
    }

    #[test]
    fn test_parse_converts_offset_to_utc() {
        let ts: IsoTimestamp = "2020-11-22T17:31:23.304+01:00".parse().unwrap();
        assert_eq!(ts.to_string(), "2020-11-22T16:31:23.304Z");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("yesterday".parse::<IsoTimestamp>().is_err());
    }

    #[test]
    fn test_now_has_millisecond_shape() {
        let rendered = IsoTimestamp::now().to_string();
        assert_eq!(rendered.len(), "2020-11-22T16:31:23.304Z".len());
        assert!(rendered.ends_with('Z'));
        assert_eq!(&rendered[19..20], ".");
    }

    #[test]
    fn test_millis_roundtrip() {
        let ts = IsoTimestamp::from_millis(1_606_062_683_304).unwrap();
        assert_eq!(ts.as_millis(), 1_606_062_683_304);
    }

    #[test]
    fn test_serde_as_string() {
        let ts: IsoTimestamp = "2020-11-22T16:31:23.304Z".parse().unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2020-11-22T16:31:23.304Z\"");
        let back: IsoTimestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }
}
