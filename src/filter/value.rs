use chrono::{DateTime, Utc};

use super::error::FilterError;
use super::types::{FieldKind, FilterField, FilterValue};

pub fn parse_age(raw: &str) -> Option<u32> {
    raw.parse().ok()
}

pub fn parse_number(raw: &str) -> Option<i32> {
    raw.parse().ok()
}

/// RFC 3339 timestamps only, normalised to UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw).ok().map(|d| d.with_timezone(&Utc))
}

/// Type-checks `raw` against the declared kind of `field`.
pub fn validate_value(field: FilterField, raw: &str) -> Result<FilterValue, FilterError> {
    let value = match field.kind() {
        FieldKind::Text => Some(FilterValue::Text(raw.to_string())),
        FieldKind::Unsigned => parse_age(raw).map(FilterValue::Unsigned),
        FieldKind::Integer => parse_number(raw).map(FilterValue::Integer),
        FieldKind::Timestamp => parse_date(raw).map(FilterValue::Timestamp),
    };
    value.ok_or(FilterError::InvalidValue(field))
}
