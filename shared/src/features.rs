//! Feature engineering for the call-count model
//!
//! Turns one observation into the enriched row the regression pipeline was
//! fitted on. Every function here is pure.

use chrono::{Datelike, NaiveDateTime};

use crate::error::FeatureError;
use crate::models::{
    clamp_rainfall, CalendarParts, EnrichedObservation, ObservationForm, RainfallBucket,
    RawObservation, RegionGroup,
};
use crate::types::{ColumnKind, ColumnSpec};

/// Pipeline input columns, in the order the pipeline expects them
pub const FEATURE_COLUMNS: [(&str, ColumnKind); 19] = [
    ("address_gu", ColumnKind::Categorical),
    ("sub_address", ColumnKind::Categorical),
    ("ta_max", ColumnKind::Numeric),
    ("ta_min", ColumnKind::Numeric),
    ("ta_max_min", ColumnKind::Numeric),
    ("hm_max", ColumnKind::Numeric),
    ("hm_min", ColumnKind::Numeric),
    ("ws_max", ColumnKind::Numeric),
    ("ws_ins_max", ColumnKind::Numeric),
    ("rn_day", ColumnKind::Numeric),
    ("year", ColumnKind::Numeric),
    ("month", ColumnKind::Numeric),
    ("day", ColumnKind::Numeric),
    ("weekday", ColumnKind::Numeric),
    ("ws_diff", ColumnKind::Numeric),
    ("wind_mean", ColumnKind::Numeric),
    ("hm_mean", ColumnKind::Numeric),
    ("rn_day_bin", ColumnKind::Categorical),
    ("region_group", ColumnKind::Categorical),
];

/// Schema of the rows produced by [`FeatureRow::from_observation`]
pub fn feature_schema() -> Vec<ColumnSpec> {
    FEATURE_COLUMNS
        .iter()
        .map(|(name, kind)| ColumnSpec::new(*name, *kind))
        .collect()
}

/// Gap between gust and sustained wind. Not bounds-checked; may be negative.
pub fn wind_gap(instant_max: f64, sustained_max: f64) -> f64 {
    instant_max - sustained_max
}

/// Mean of gust and sustained wind
pub fn wind_mean(instant_max: f64, sustained_max: f64) -> f64 {
    (instant_max + sustained_max) / 2.0
}

/// Mean of a daily min/max pair
pub fn daily_mean(min: f64, max: f64) -> f64 {
    (min + max) / 2.0
}

/// Year, month, day and Monday-based weekday of a naive timestamp
pub fn calendar_parts(timestamp: &NaiveDateTime) -> CalendarParts {
    let date = timestamp.date();
    CalendarParts {
        year: date.year(),
        month: date.month(),
        day: date.day(),
        weekday: date.weekday().num_days_from_monday(),
    }
}

/// Derive every model feature from a validated observation
pub fn enrich(raw: &RawObservation) -> EnrichedObservation {
    let rainfall_mm = clamp_rainfall(raw.rainfall_mm);

    EnrichedObservation {
        city: raw.city.clone(),
        district: raw.district.clone(),
        sub_district: raw.sub_district.clone(),
        temperature_max: raw.temperature_max,
        temperature_min: raw.temperature_min,
        humidity_max: raw.humidity_max,
        humidity_min: raw.humidity_min,
        wind_speed_max: raw.wind_speed_max,
        wind_speed_instant_max: raw.wind_speed_instant_max,
        rainfall_mm,
        calendar: calendar_parts(&raw.timestamp),
        temperature_range: raw.temperature_max - raw.temperature_min,
        wind_gap: wind_gap(raw.wind_speed_instant_max, raw.wind_speed_max),
        wind_mean: wind_mean(raw.wind_speed_instant_max, raw.wind_speed_max),
        humidity_mean: daily_mean(raw.humidity_min, raw.humidity_max),
        rainfall_bucket: RainfallBucket::classify(rainfall_mm),
        region_group: RegionGroup::for_district(&raw.district),
    }
}

/// Reject derived features that overflowed to a non-finite value.
/// Finite inputs near `f64::MAX` can still sum past it.
pub fn check_derived(obs: &EnrichedObservation) -> Result<(), FeatureError> {
    let derived = [
        ("temperature_range", obs.temperature_range),
        ("wind_gap", obs.wind_gap),
        ("wind_mean", obs.wind_mean),
        ("humidity_mean", obs.humidity_mean),
    ];
    match derived.iter().find(|(_, value)| !value.is_finite()) {
        Some((field, _)) => Err(FeatureError::validation(
            *field,
            "derived value is out of range",
        )),
        None => Ok(()),
    }
}

/// Validate a submitted form and enrich it
pub fn transform(form: ObservationForm) -> Result<EnrichedObservation, FeatureError> {
    let raw = form.into_observation()?;
    let enriched = enrich(&raw);
    check_derived(&enriched)?;
    Ok(enriched)
}

/// A single pipeline input value
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Numeric(f64),
    Categorical(String),
}

impl FeatureValue {
    pub fn kind(&self) -> ColumnKind {
        match self {
            FeatureValue::Numeric(_) => ColumnKind::Numeric,
            FeatureValue::Categorical(_) => ColumnKind::Categorical,
        }
    }
}

/// Ordered, named feature columns for one observation
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    columns: Vec<(String, FeatureValue)>,
}

impl FeatureRow {
    /// Build a row from explicit columns. Used for rows that do not come
    /// from the transform.
    pub fn from_columns(columns: Vec<(String, FeatureValue)>) -> Self {
        Self { columns }
    }

    /// Lay out an enriched observation in [`FEATURE_COLUMNS`] order
    pub fn from_observation(obs: &EnrichedObservation) -> Self {
        let cat = |s: &str| FeatureValue::Categorical(s.to_string());
        let num = FeatureValue::Numeric;

        let values = [
            cat(obs.district.as_str()),
            cat(obs.sub_district.as_str()),
            num(obs.temperature_max),
            num(obs.temperature_min),
            num(obs.temperature_range),
            num(obs.humidity_max),
            num(obs.humidity_min),
            num(obs.wind_speed_max),
            num(obs.wind_speed_instant_max),
            num(obs.rainfall_mm),
            num(f64::from(obs.calendar.year)),
            num(f64::from(obs.calendar.month)),
            num(f64::from(obs.calendar.day)),
            num(f64::from(obs.calendar.weekday)),
            num(obs.wind_gap),
            num(obs.wind_mean),
            num(obs.humidity_mean),
            cat(obs.rainfall_bucket.label_ko()),
            cat(obs.region_group.label_ko()),
        ];

        let columns = FEATURE_COLUMNS
            .iter()
            .zip(values)
            .map(|((name, _), value)| (name.to_string(), value))
            .collect();
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Column names and kinds as they appear in this row
    pub fn schema(&self) -> Vec<ColumnSpec> {
        self.columns
            .iter()
            .map(|(name, value)| ColumnSpec::new(name.clone(), value.kind()))
            .collect()
    }
}

impl From<&EnrichedObservation> for FeatureRow {
    fn from(obs: &EnrichedObservation) -> Self {
        FeatureRow::from_observation(obs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn raw(rainfall_mm: f64, district: &str) -> RawObservation {
        RawObservation {
            timestamp: NaiveDate::from_ymd_opt(2024, 7, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            city: "부산광역시".into(),
            district: district.into(),
            sub_district: "우동".into(),
            temperature_max: 28.5,
            temperature_min: 20.0,
            humidity_max: 85.0,
            humidity_min: 60.0,
            wind_speed_max: 4.2,
            wind_speed_instant_max: 6.5,
            rainfall_mm,
        }
    }

    /// Rebuild a raw observation from enriched output, as if the timestamp
    /// had been kept
    fn rebuild(obs: &EnrichedObservation) -> RawObservation {
        RawObservation {
            timestamp: NaiveDate::from_ymd_opt(obs.calendar.year, obs.calendar.month, obs.calendar.day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            city: obs.city.clone(),
            district: obs.district.clone(),
            sub_district: obs.sub_district.clone(),
            temperature_max: obs.temperature_max,
            temperature_min: obs.temperature_min,
            humidity_max: obs.humidity_max,
            humidity_min: obs.humidity_min,
            wind_speed_max: obs.wind_speed_max,
            wind_speed_instant_max: obs.wind_speed_instant_max,
            rainfall_mm: obs.rainfall_mm,
        }
    }

    #[test]
    fn test_enrich_derives_all_fields() {
        let obs = enrich(&raw(12.0, "해운대구"));
        // 2024-07-15 is a Monday
        assert_eq!(
            obs.calendar,
            CalendarParts {
                year: 2024,
                month: 7,
                day: 15,
                weekday: 0
            }
        );
        assert_eq!(obs.wind_gap, 6.5 - 4.2);
        assert_eq!(obs.wind_mean, (6.5 + 4.2) / 2.0);
        assert_eq!(obs.humidity_mean, 72.5);
        assert_eq!(obs.temperature_range, 8.5);
        assert_eq!(obs.rainfall_bucket, RainfallBucket::Moderate);
        assert_eq!(obs.region_group, RegionGroup::Coastal);
    }

    #[test]
    fn test_sunday_is_six() {
        let mut r = raw(0.0, "중구");
        r.timestamp = NaiveDate::from_ymd_opt(2024, 7, 21)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap();
        assert_eq!(enrich(&r).calendar.weekday, 6);
    }

    #[test]
    fn test_rainfall_examples() {
        let dry = enrich(&raw(-5.0, "중구"));
        assert_eq!(dry.rainfall_mm, 0.0);
        assert_eq!(dry.rainfall_bucket, RainfallBucket::None);

        assert_eq!(enrich(&raw(10.0, "중구")).rainfall_bucket, RainfallBucket::Weak);
    }

    #[test]
    fn test_negative_wind_gap_is_kept() {
        let mut r = raw(0.0, "중구");
        r.wind_speed_instant_max = 3.0;
        r.wind_speed_max = 5.0;
        assert_eq!(enrich(&r).wind_gap, -2.0);
    }

    #[test]
    fn test_unknown_district_is_other() {
        assert_eq!(enrich(&raw(0.0, "수성구")).region_group, RegionGroup::Other);
    }

    #[test]
    fn test_transform_from_form() {
        let form: ObservationForm = serde_json::from_value(serde_json::json!({
            "timestamp": "2024-07-15 09:00:00",
            "district": "사하구",
            "sub_district": "다대동",
            "temperature_max": "31",
            "temperature_min": 24,
            "humidity_max": 90,
            "humidity_min": 70,
            "wind_speed_max": 3.1,
            "wind_speed_instant_max": 7.4,
            "rainfall_mm": 75
        }))
        .unwrap();

        let obs = transform(form).unwrap();
        assert_eq!(obs.region_group, RegionGroup::RiversideLowland);
        assert_eq!(obs.rainfall_bucket, RainfallBucket::VeryStrong);
        assert_eq!(obs.temperature_range, 7.0);
    }

    #[test]
    fn test_overflowing_derived_value_is_validation_error() {
        let form: ObservationForm = serde_json::from_value(serde_json::json!({
            "timestamp": "2024-07-15",
            "district": "중구",
            "sub_district": "중앙동",
            "temperature_max": 1e308,
            "temperature_min": -1e308,
            "humidity_max": 90,
            "humidity_min": 70,
            "wind_speed_max": 3.1,
            "wind_speed_instant_max": 7.4,
            "rainfall_mm": 0
        }))
        .unwrap();

        let err = transform(form).unwrap_err();
        assert!(matches!(err, FeatureError::Validation { .. }));
        assert_eq!(err.field(), "temperature_range");
    }

    #[test]
    fn test_check_derived_reports_wind_overflow() {
        let mut r = raw(0.0, "중구");
        r.wind_speed_max = f64::MAX;
        r.wind_speed_instant_max = f64::MAX;
        let err = check_derived(&enrich(&r)).unwrap_err();
        assert_eq!(err.field(), "wind_mean");

        assert!(check_derived(&enrich(&raw(0.0, "중구"))).is_ok());
    }

    #[test]
    fn test_feature_row_layout() {
        let obs = enrich(&raw(12.0, "해운대구"));
        let row = FeatureRow::from(&obs);

        assert_eq!(row.len(), FEATURE_COLUMNS.len());
        assert_eq!(row.schema(), feature_schema());
        assert_eq!(
            row.get("rn_day_bin"),
            Some(&FeatureValue::Categorical("보통 비".into()))
        );
        assert_eq!(
            row.get("region_group"),
            Some(&FeatureValue::Categorical("해안지역".into()))
        );
        assert_eq!(row.get("weekday"), Some(&FeatureValue::Numeric(0.0)));
        assert_eq!(row.get("ta_max_min"), Some(&FeatureValue::Numeric(8.5)));
        assert_eq!(row.get("tm"), None);
    }

    #[test]
    fn test_serialized_observation_has_no_timestamp() {
        let json = serde_json::to_value(enrich(&raw(0.0, "중구"))).unwrap();
        assert!(json.get("timestamp").is_none());
        assert_eq!(json["year"], 2024);
        assert_eq!(json["rainfall_bucket"], "none");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_wind_gap_is_exact(instant in -50.0f64..80.0, sustained in -50.0f64..80.0) {
            prop_assert_eq!(wind_gap(instant, sustained), instant - sustained);
            prop_assert_eq!(wind_gap(instant, sustained), -(sustained - instant));
        }

        #[test]
        fn prop_transform_is_idempotent(
            rain in -20.0f64..300.0,
            gust in 0.0f64..40.0,
            wind in 0.0f64..30.0,
            idx in 0usize..18,
        ) {
            let districts = [
                "해운대구", "수영구", "영도구", "중구", "동구", "서구", "남구", "부산진구",
                "동래구", "연제구", "금정구", "기장군", "강서구", "북구", "사상구", "사하구",
                "창원시", "",
            ];
            let mut r = raw(rain, districts[idx]);
            r.wind_speed_instant_max = gust;
            r.wind_speed_max = wind;

            let once = enrich(&r);
            let twice = enrich(&rebuild(&once));
            prop_assert_eq!(once, twice);
        }
    }
}
