//! # Temporal Types
//!
//! UTC-only timestamp used on audit records and persisted rows.
//!
//! Serialized form is ISO 8601 with millisecond precision and a `Z` suffix
//! (e.g., `2024-05-15T12:00:00.123Z`). Local time conversion is a
//! presentation concern handled outside this workspace.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A UTC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC time.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Wrap a `chrono::DateTime<Utc>`.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Access the underlying `chrono::DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// ISO 8601 with milliseconds and `Z` suffix.
    pub fn to_iso_string(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn iso_string_has_millis_and_z() {
        let dt = Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap();
        let ts = Timestamp::from_datetime(dt);
        assert_eq!(ts.to_iso_string(), "2024-05-15T12:00:00.000Z");
    }

    #[test]
    fn serde_roundtrip() {
        let ts = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 5).unwrap());
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2024-01-15T08:30:05.000Z\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }
}
