//! Boundary validation for snapshots entering the engine
//!
//! The scoring functions assume sanitized inputs. Callers run these checks
//! first and reject the request on the first failure.

use std::collections::HashSet;

use crate::models::{RainfallRecord, Tanker, Village};
use crate::types::GpsCoordinates;

// ============================================================================
// Location Validations
// ============================================================================

/// Validate latitude/longitude ranges
pub fn validate_coordinates(coordinates: &GpsCoordinates) -> Result<(), &'static str> {
    if !coordinates.latitude.is_finite() || !coordinates.longitude.is_finite() {
        return Err("Coordinates must be finite numbers");
    }
    if !(-90.0..=90.0).contains(&coordinates.latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    if !(-180.0..=180.0).contains(&coordinates.longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

// ============================================================================
// Snapshot Validations
// ============================================================================

pub fn validate_village(village: &Village) -> Result<(), &'static str> {
    if village.id.trim().is_empty() {
        return Err("Village id is required");
    }
    if village.stress_score > 100 {
        return Err("Stress score must be between 0 and 100");
    }
    if !village.groundwater_depth_m.is_finite() || village.groundwater_depth_m < 0.0 {
        return Err("Groundwater depth cannot be negative");
    }
    if !village.historical_avg_rainfall_mm.is_finite() || village.historical_avg_rainfall_mm < 0.0 {
        return Err("Historical rainfall cannot be negative");
    }
    if !village.rainfall_deviation.is_finite() {
        return Err("Rainfall deviation must be a finite number");
    }
    validate_coordinates(&village.coordinates)
}

pub fn validate_tanker(tanker: &Tanker) -> Result<(), &'static str> {
    if tanker.id.trim().is_empty() {
        return Err("Tanker id is required");
    }
    if tanker.capacity_liters == 0 {
        return Err("Tanker capacity must be greater than zero");
    }
    validate_coordinates(&tanker.depot)
}

/// Validate a daily rainfall series: non-negative amounts, one record per village per day
pub fn validate_rainfall_records(records: &[RainfallRecord]) -> Result<(), &'static str> {
    let mut seen = HashSet::new();
    for record in records {
        if !record.rain_mm.is_finite() || record.rain_mm < 0.0 {
            return Err("Rainfall cannot be negative");
        }
        if !seen.insert((record.village_id.as_str(), record.date)) {
            return Err("Duplicate rainfall record for the same village and date");
        }
    }
    Ok(())
}

/// Validate raw inputs to the stress model
pub fn validate_stress_inputs(
    recent_rainfall_mm: f64,
    historical_avg_rainfall_mm: f64,
    groundwater_depth_m: f64,
) -> Result<(), &'static str> {
    let all_finite = [recent_rainfall_mm, historical_avg_rainfall_mm, groundwater_depth_m]
        .iter()
        .all(|v| v.is_finite());
    if !all_finite {
        return Err("Stress inputs must be finite numbers");
    }
    if recent_rainfall_mm < 0.0 || historical_avg_rainfall_mm < 0.0 {
        return Err("Rainfall cannot be negative");
    }
    if groundwater_depth_m < 0.0 {
        return Err("Groundwater depth cannot be negative");
    }
    Ok(())
}
