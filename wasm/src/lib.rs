//! WebAssembly module for JalSarthi
//!
//! Provides client-side computation for:
//! - Water stress scoring
//! - Stress band and priority classification
//! - Tanker ranking for map previews
//! - Per-village rainfall forecasts

use chrono::NaiveDate;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Score a village and return the assessment as JSON
#[wasm_bindgen]
pub fn compute_water_stress(
    recent_rainfall_mm: f64,
    historical_avg_rainfall_mm: f64,
    groundwater_depth_m: f64,
    population: u32,
) -> Result<String, JsValue> {
    stress_json(recent_rainfall_mm, historical_avg_rainfall_mm, groundwater_depth_m, population)
        .map_err(|e| JsValue::from_str(&e))
}

/// Dashboard band for a score: "safe", "warning" or "critical"
#[wasm_bindgen]
pub fn stress_level_for_score(score: u32) -> String {
    StressLevel::from_score(score).to_string()
}

/// Dispatch priority derived from a stress score
#[wasm_bindgen]
pub fn priority_for_stress(score: u32) -> String {
    Priority::from_stress(score).to_string()
}

/// Great-circle distance in km, rounded to 0.1
#[wasm_bindgen]
pub fn distance_between_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    round_to(distance_km(lat1, lng1, lat2, lng2), 1)
}

/// Rank available tankers for a target location
#[wasm_bindgen]
pub fn recommend_tankers_json(tankers_json: &str, lat: f64, lng: f64, limit: usize) -> Result<String, JsValue> {
    recommendations(tankers_json, lat, lng, limit).map_err(|e| JsValue::from_str(&e))
}

/// Forecast one village from its rainfall records.
///
/// `today` is an ISO date (`YYYY-MM-DD`).
#[wasm_bindgen]
pub fn forecast_village_json(village_json: &str, records_json: &str, today: &str) -> Result<String, JsValue> {
    forecast(village_json, records_json, today).map_err(|e| JsValue::from_str(&e))
}

fn stress_json(recent: f64, historical: f64, groundwater: f64, population: u32) -> Result<String, String> {
    validate_stress_inputs(recent, historical, groundwater).map_err(str::to_string)?;
    let assessment = shared::compute_stress(recent, historical, groundwater, population);
    serde_json::to_string(&assessment).map_err(|e| e.to_string())
}

fn recommendations(tankers_json: &str, lat: f64, lng: f64, limit: usize) -> Result<String, String> {
    let tankers: Vec<Tanker> =
        serde_json::from_str(tankers_json).map_err(|e| format!("Invalid tankers JSON: {}", e))?;
    let target = GpsCoordinates::new(lat, lng);
    validate_coordinates(&target).map_err(str::to_string)?;

    let ranked = shared::recommend_tankers(&tankers, target, None, limit);
    serde_json::to_string(&ranked).map_err(|e| e.to_string())
}

fn forecast(village_json: &str, records_json: &str, today: &str) -> Result<String, String> {
    let village: Village =
        serde_json::from_str(village_json).map_err(|e| format!("Invalid village JSON: {}", e))?;
    let records: Vec<RainfallRecord> =
        serde_json::from_str(records_json).map_err(|e| format!("Invalid records JSON: {}", e))?;
    let today = NaiveDate::parse_from_str(today, "%Y-%m-%d").map_err(|e| format!("Invalid date: {}", e))?;
    validate_rainfall_records(&records).map_err(str::to_string)?;

    let own: Vec<RainfallRecord> = records.into_iter().filter(|r| r.village_id == village.id).collect();
    let result = shared::forecast_village(&village, &own, today);
    serde_json::to_string(&result).map_err(|e| e.to_string())
}
