//! Weather observation models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::FeatureError;
use crate::models::{RainfallBucket, RegionGroup};
use crate::types::FieldValue;
use crate::validation::{
    first_validation_error, parse_timestamp, require_number, require_text, validate_name,
};

/// City assumed when a submission leaves it out
pub const DEFAULT_CITY: &str = "부산광역시";

/// Observation as submitted by the dashboard.
///
/// Accepts the original dataset column names (`tm`, `address_gu`, `rn_day`, ...)
/// as aliases. Fields keep whatever JSON type was sent so a wrong type is
/// reported against the field that carried it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ObservationForm {
    #[serde(alias = "tm")]
    pub timestamp: Option<FieldValue>,
    #[serde(alias = "address_city")]
    #[validate(custom = "validate_name")]
    pub city: Option<FieldValue>,
    #[serde(alias = "address_gu")]
    #[validate(required, custom = "validate_name")]
    pub district: Option<FieldValue>,
    #[serde(alias = "sub_address")]
    #[validate(required, custom = "validate_name")]
    pub sub_district: Option<FieldValue>,
    #[serde(alias = "ta_max")]
    pub temperature_max: Option<FieldValue>,
    #[serde(alias = "ta_min")]
    pub temperature_min: Option<FieldValue>,
    #[serde(alias = "hm_max")]
    pub humidity_max: Option<FieldValue>,
    #[serde(alias = "hm_min")]
    pub humidity_min: Option<FieldValue>,
    #[serde(alias = "ws_max")]
    pub wind_speed_max: Option<FieldValue>,
    #[serde(alias = "ws_ins_max")]
    pub wind_speed_instant_max: Option<FieldValue>,
    #[serde(alias = "rn_day")]
    pub rainfall_mm: Option<FieldValue>,
}

impl ObservationForm {
    /// Check every field and build an immutable [`RawObservation`]
    pub fn into_observation(self) -> Result<RawObservation, FeatureError> {
        let timestamp = match &self.timestamp {
            Some(FieldValue::Text(raw)) => parse_timestamp(raw)?,
            Some(other) => {
                return Err(FeatureError::parse(
                    "timestamp",
                    format!("expected a date string, got {}", other.type_name()),
                ))
            }
            None => return Err(FeatureError::parse("timestamp", "timestamp is required")),
        };

        self.validate().map_err(|e| first_validation_error(&e))?;

        let city = match self.city.as_ref().and_then(FieldValue::as_text).map(str::trim) {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => DEFAULT_CITY.to_string(),
        };

        Ok(RawObservation {
            timestamp,
            city,
            district: require_text("district", self.district.as_ref())?,
            sub_district: require_text("sub_district", self.sub_district.as_ref())?,
            temperature_max: require_number("temperature_max", self.temperature_max.as_ref())?,
            temperature_min: require_number("temperature_min", self.temperature_min.as_ref())?,
            humidity_max: require_number("humidity_max", self.humidity_max.as_ref())?,
            humidity_min: require_number("humidity_min", self.humidity_min.as_ref())?,
            wind_speed_max: require_number("wind_speed_max", self.wind_speed_max.as_ref())?,
            wind_speed_instant_max: require_number(
                "wind_speed_instant_max",
                self.wind_speed_instant_max.as_ref(),
            )?,
            rainfall_mm: require_number("rainfall_mm", self.rainfall_mm.as_ref())?,
        })
    }
}

/// One day of weather for a sub-district
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawObservation {
    pub timestamp: NaiveDateTime,
    pub city: String,
    pub district: String,
    pub sub_district: String,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub humidity_max: f64,
    pub humidity_min: f64,
    /// Maximum sustained wind speed (m/s)
    pub wind_speed_max: f64,
    /// Maximum instantaneous wind speed (m/s)
    pub wind_speed_instant_max: f64,
    /// Daily rainfall (mm), possibly negative from sensor noise
    pub rainfall_mm: f64,
}

/// Calendar decomposition of an observation date
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Monday = 0 ... Sunday = 6
    pub weekday: u32,
}

/// Observation with derived features. The timestamp is replaced by its
/// calendar parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedObservation {
    pub city: String,
    pub district: String,
    pub sub_district: String,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub humidity_max: f64,
    pub humidity_min: f64,
    pub wind_speed_max: f64,
    pub wind_speed_instant_max: f64,
    /// Rainfall clamped at zero
    pub rainfall_mm: f64,
    #[serde(flatten)]
    pub calendar: CalendarParts,
    pub temperature_range: f64,
    pub wind_gap: f64,
    pub wind_mean: f64,
    pub humidity_mean: f64,
    pub rainfall_bucket: RainfallBucket,
    pub region_group: RegionGroup,
}
