//! WebAssembly module for LOGIS:COPE
//!
//! Provides client-side previews of the feature transform:
//! - Rainfall severity bucket
//! - District region group
//! - Full observation enrichment

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

/// Rainfall bucket label (snake_case) for a daily rainfall amount
#[wasm_bindgen]
pub fn rainfall_bucket(rainfall_mm: f64) -> String {
    RainfallBucket::classify(rainfall_mm).id().to_string()
}

/// Region group label (snake_case) for a district name
#[wasm_bindgen]
pub fn region_group(district: &str) -> String {
    RegionGroup::for_district(district.trim()).id().to_string()
}

/// Korean label shown next to the rainfall input
#[wasm_bindgen]
pub fn rainfall_bucket_label_ko(rainfall_mm: f64) -> String {
    RainfallBucket::classify(rainfall_mm).label_ko().to_string()
}

/// Enrich an observation form given as JSON; returns the enriched JSON
#[wasm_bindgen]
pub fn enrich_observation(form_json: &str) -> Result<String, JsValue> {
    enrich_json(form_json).map_err(|e| JsValue::from_str(&e))
}

fn enrich_json(form_json: &str) -> Result<String, String> {
    let form: ObservationForm =
        serde_json::from_str(form_json).map_err(|e| format!("Invalid observation JSON: {}", e))?;
    let enriched = shared::transform(form).map_err(|e| e.to_string())?;
    serde_json::to_string(&enriched).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rainfall_bucket() {
        assert_eq!(rainfall_bucket(-5.0), "none");
        assert_eq!(rainfall_bucket(10.0), "weak");
        assert_eq!(rainfall_bucket(29.9), "moderate");
        assert_eq!(rainfall_bucket(100.0), "very_strong");
        assert_eq!(rainfall_bucket_label_ko(45.0), "강한 비");
    }

    #[test]
    fn test_region_group() {
        assert_eq!(region_group("해운대구"), "coastal");
        assert_eq!(region_group(" 동래구 "), "inland_urban");
        assert_eq!(region_group("서울"), "other");
    }

    #[test]
    fn test_enrich_json() {
        let json = r#"{
            "tm": "2024-07-15",
            "address_gu": "기장군",
            "sub_address": "기장읍",
            "ta_max": 28.5, "ta_min": 20.0,
            "hm_max": 85, "hm_min": 60,
            "ws_max": 4.2, "ws_ins_max": 6.5,
            "rn_day": 0
        }"#;
        let out: serde_json::Value = serde_json::from_str(&enrich_json(json).unwrap()).unwrap();
        assert_eq!(out["region_group"], "mountain_highland");
        assert_eq!(out["rainfall_bucket"], "none");
        assert_eq!(out["weekday"], 0);
    }

    #[test]
    fn test_enrich_json_reports_errors() {
        assert!(enrich_json("{").unwrap_err().starts_with("Invalid observation JSON"));
        let err = enrich_json(r#"{"tm": "soon"}"#).unwrap_err();
        assert!(err.contains("timestamp"));
    }
}
