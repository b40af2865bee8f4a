//! Fixed textual formats used for timestamps and dates at every boundary
//! (storage columns, follow-up log lines and JSON output).

use chrono::{NaiveDate, NaiveDateTime};

/// `YYYY-MM-DD HH:MM:SS`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// `YYYY-MM-DD`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

pub fn format_date(value: &NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// Parses a stored timestamp. A bare date is accepted as midnight of that day.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .ok()
        .or_else(|| parse_date(raw).and_then(|date| date.and_hms_opt(0, 0, 0)))
}

/// Parses a stored date. A full timestamp is accepted and truncated to its date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok().or_else(|| {
        NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
            .ok()
            .map(|value| value.date())
    })
}

/// `#[serde(with = "...")]` helpers for optional timestamps.
pub mod opt_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_str(&super::format_timestamp(value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => super::parse_timestamp(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {raw:?}"))),
        }
    }
}

/// `#[serde(with = "...")]` helpers for optional dates.
pub mod opt_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_str(&super::format_date(value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => super::parse_date(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date {raw:?}"))),
        }
    }
}
