//! Core types shared across the index engine.

use crate::error::KegError;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// NodeID: permanent integer identifier of a node, also its directory name
pub type NodeID = u64;

/// Timestamp text form used by both persisted index files
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%SZ";

/// Parse a node identifier in canonical decimal form.
///
/// Accepts `0` or a digit string without leading zeros. Signs, whitespace,
/// and leading zeros are rejected so that every identifier has exactly one
/// directory name.
pub fn parse_node_id(text: &str) -> Result<NodeID, KegError> {
    let bytes = text.as_bytes();
    let canonical = match bytes {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        _ => bytes.iter().all(u8::is_ascii_digit),
    };
    if !canonical {
        return Err(KegError::InvalidIdentifier(text.to_string()));
    }
    text.parse::<NodeID>()
        .map_err(|_| KegError::InvalidIdentifier(text.to_string()))
}

/// Render a timestamp as `YYYY-MM-DD HH:MM:SSZ`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp rendered by [`format_timestamp`].
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Serde adapter for timestamps in the persisted text form.
pub mod timestamp_text {
    use super::{format_timestamp, parse_timestamp};
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_timestamp(&text)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp {:?}", text)))
    }
}

/// Drop sub-second precision; persisted timestamps carry whole seconds only.
pub fn truncate_to_seconds(ts: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_opt(ts.timestamp(), 0).single().unwrap_or(ts)
}
