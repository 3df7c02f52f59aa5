//! Timestamp utilities
//!
//! Stored feedback records were written by several generations of the
//! submission UI. Older records carry epoch milliseconds, newer ones RFC 3339
//! strings. Both decode to `DateTime<Utc>`.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

/// UTC timestamp used throughout the feedback model
pub type Timestamp = DateTime<Utc>;

/// Get current UTC timestamp
pub fn now() -> Timestamp {
    Utc::now()
}

/// Convert epoch milliseconds to a UTC timestamp
///
/// Returns `None` for values chrono cannot represent.
pub fn from_epoch_millis(millis: i64) -> Option<Timestamp> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Parse a timestamp from either RFC 3339 text or a numeric string of epoch millis
pub fn parse_timestamp(text: &str) -> Option<Timestamp> {
    let trimmed = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    trimmed.parse::<i64>().ok().and_then(from_epoch_millis)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Float(f64),
    Text(String),
}

impl RawTimestamp {
    fn into_timestamp(self) -> Option<Timestamp> {
        match self {
            RawTimestamp::Millis(millis) => from_epoch_millis(millis),
            RawTimestamp::Float(millis) => from_epoch_millis(millis as i64),
            RawTimestamp::Text(text) => parse_timestamp(&text),
        }
    }
}

/// Serde helper for required timestamps in either stored format
pub fn deserialize_flexible<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    RawTimestamp::deserialize(deserializer)?
        .into_timestamp()
        .ok_or_else(|| serde::de::Error::custom("unrecognized timestamp format"))
}

/// Serde helper for optional timestamps in either stored format
///
/// `null` and absent fields both decode to `None`; use with `#[serde(default)]`.
pub fn deserialize_flexible_opt<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawTimestamp>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => raw
            .into_timestamp()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("unrecognized timestamp format")),
    }
}
