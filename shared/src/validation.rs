//! Input validation for submitted observations

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use validator::{ValidationError, ValidationErrors};

use crate::error::FeatureError;
use crate::types::FieldValue;

/// Longest accepted city or district name, in characters
pub const MAX_NAME_CHARS: usize = 40;

/// Date-time layouts accepted besides RFC 3339
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse an observation timestamp as a naive local date-time.
///
/// Offsets in RFC 3339 input are dropped; the wall-clock date is kept.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, FeatureError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FeatureError::parse("timestamp", "timestamp is empty"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }

    Err(FeatureError::parse(
        "timestamp",
        format!("'{}' is not a recognized date", raw),
    ))
}

/// Require a numeric field to be present, numeric and finite
pub fn require_number(field: &str, value: Option<&FieldValue>) -> Result<f64, FeatureError> {
    let value = value.ok_or_else(|| FeatureError::validation(field, "value is required"))?;
    value.as_finite().ok_or_else(|| match value {
        FieldValue::Text(s) => {
            FeatureError::validation(field, format!("'{}' is not a number", s.trim()))
        }
        FieldValue::Number(_) => FeatureError::validation(field, "value must be finite"),
        other => FeatureError::validation(
            field,
            format!("expected a number, got {}", other.type_name()),
        ),
    })
}

/// Require a text field to be present, a string and non-blank; returns it trimmed
pub fn require_text(field: &str, value: Option<&FieldValue>) -> Result<String, FeatureError> {
    let value = value.ok_or_else(|| FeatureError::validation(field, "value is required"))?;
    let text = value.as_text().map(str::trim).ok_or_else(|| {
        FeatureError::validation(
            field,
            format!("expected a string, got {}", value.type_name()),
        )
    })?;
    if text.is_empty() {
        return Err(FeatureError::validation(field, "value must not be blank"));
    }
    Ok(text.to_string())
}

/// `validator` check for name fields: a string of at most [`MAX_NAME_CHARS`]
pub fn validate_name(value: &FieldValue) -> Result<(), ValidationError> {
    let message = match value.as_text() {
        Some(text) if text.chars().count() <= MAX_NAME_CHARS => return Ok(()),
        Some(_) => format!("must be at most {} characters", MAX_NAME_CHARS),
        None => format!("expected a string, got {}", value.type_name()),
    };
    let mut error = ValidationError::new("name");
    error.message = Some(Cow::from(message));
    Err(error)
}

/// Collapse `validator` errors into the first offending field
pub fn first_validation_error(errors: &ValidationErrors) -> FeatureError {
    let field_errors = errors.field_errors();
    let mut fields: Vec<&&str> = field_errors.keys().collect();
    fields.sort();

    match fields.first() {
        Some(field) => {
            let message = field_errors[**field]
                .first()
                .map(|e| match &e.message {
                    Some(m) => m.to_string(),
                    None => format!("failed '{}' check", e.code),
                })
                .unwrap_or_else(|| "invalid value".to_string());
            FeatureError::validation(**field, message)
        }
        None => FeatureError::validation("observation", errors.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_plain_date() {
        let dt = parse_timestamp("2024-07-15").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 7, 15));
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_datetime_layouts() {
        assert!(parse_timestamp("2024-07-15 13:45:00").is_ok());
        assert!(parse_timestamp("2024-07-15T13:45:00").is_ok());
        assert!(parse_timestamp("2024-07-15T13:45:00.250").is_ok());
        assert!(parse_timestamp("2024-07-15 13:45").is_ok());
        assert!(parse_timestamp("  2024-07-15  ").is_ok());
    }

    #[test]
    fn test_parse_rfc3339_keeps_local_date() {
        let dt = parse_timestamp("2024-07-15T23:30:00+09:00").unwrap();
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 23);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "yesterday", "2024-13-01", "2024-02-30", "15/07/2024"] {
            let err = parse_timestamp(bad).unwrap_err();
            assert!(matches!(err, FeatureError::Parse { .. }), "{}", bad);
        }
    }

    #[test]
    fn test_require_number() {
        assert_eq!(require_number("rn_day", Some(&FieldValue::Number(3.0))), Ok(3.0));
        assert_eq!(require_number("rn_day", Some(&FieldValue::from("4.5"))), Ok(4.5));

        let missing = require_number("rn_day", None).unwrap_err();
        assert_eq!(missing.field(), "rn_day");

        let text = require_number("ws_max", Some(&FieldValue::from("windy"))).unwrap_err();
        assert!(matches!(text, FeatureError::Validation { .. }));
        assert!(text.to_string().contains("windy"));

        let flag = FieldValue::Other(serde_json::Value::Bool(true));
        let err = require_number("rn_day", Some(&flag)).unwrap_err();
        assert_eq!(err.field(), "rn_day");
        assert!(err.to_string().contains("boolean"));
    }

    #[test]
    fn test_require_text() {
        let district = FieldValue::from(" 중구 ");
        assert_eq!(require_text("district", Some(&district)), Ok("중구".to_string()));
        assert!(require_text("district", Some(&FieldValue::from("   "))).is_err());
        assert!(require_text("district", None).is_err());

        let err = require_text("district", Some(&FieldValue::Number(5.0))).unwrap_err();
        assert_eq!(err.field(), "district");
        assert!(err.to_string().contains("number"));
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name(&FieldValue::from("해운대구")).is_ok());
        assert!(validate_name(&FieldValue::from("가".repeat(MAX_NAME_CHARS).as_str())).is_ok());
        assert!(validate_name(&FieldValue::from("가".repeat(MAX_NAME_CHARS + 1).as_str())).is_err());

        let err = validate_name(&FieldValue::Number(5.0)).unwrap_err();
        assert_eq!(err.message.as_deref(), Some("expected a string, got number"));
    }
}
