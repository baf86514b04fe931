//! Water Stress Index
//!
//! Combines three saturating signals into a 0-100 score:
//! - rainfall deviation (40%): a shortfall of 60% or worse saturates
//! - groundwater depth (40%): 20 m or deeper saturates
//! - population (20%): 50,000 or more saturates
//!
//! Inputs are assumed sanitized; see [`crate::validation::validate_stress_inputs`].

use serde::{Deserialize, Serialize};

use crate::types::round_half_up;

/// Per-capita daily need in liters (rural LPCD norm)
pub const DAILY_LITERS_PER_CAPITA: f64 = 40.0;

/// Reference tanker size for demand estimation, independent of the real fleet
pub const REFERENCE_TANKER_LITERS: f64 = 10_000.0;

const RAINFALL_SATURATION_PCT: f64 = 60.0;
const GROUNDWATER_SATURATION_M: f64 = 20.0;
const POPULATION_SATURATION: f64 = 50_000.0;

/// Output of the stress model
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StressAssessment {
    /// 0-100
    pub stress_score: u32,
    /// Percent deviation from the baseline, rounded to a whole percent
    pub rainfall_deviation: f64,
    /// Tanker trips per week
    pub tanker_demand: u32,
}

/// Score a village from recent rainfall, its baseline, groundwater depth and population
pub fn compute_stress(
    recent_rainfall_mm: f64,
    historical_avg_rainfall_mm: f64,
    groundwater_depth_m: f64,
    population: u32,
) -> StressAssessment {
    // A zero baseline (dry season) carries no meaningful deviation
    let deviation = if historical_avg_rainfall_mm > 0.0 {
        (recent_rainfall_mm - historical_avg_rainfall_mm) / historical_avg_rainfall_mm * 100.0
    } else {
        0.0
    };

    let rainfall_score = (-deviation / RAINFALL_SATURATION_PCT * 100.0).clamp(0.0, 100.0);
    let groundwater_score = (groundwater_depth_m / GROUNDWATER_SATURATION_M * 100.0).clamp(0.0, 100.0);
    let population_score = (f64::from(population) / POPULATION_SATURATION * 100.0).clamp(0.0, 100.0);

    let combined = round_half_up(rainfall_score * 0.4 + groundwater_score * 0.4 + population_score * 0.2);
    let stress_score = combined.clamp(0.0, 100.0) as u32;

    StressAssessment {
        stress_score,
        rainfall_deviation: round_half_up(deviation),
        tanker_demand: tanker_demand(stress_score, population),
    }
}

/// Fraction of the population needing tanker supply at a given score.
///
/// 0 below 50, 10%-40% linear over 50-75, 40%-80% linear above 75.
pub fn need_fraction(stress_score: u32) -> f64 {
    let score = f64::from(stress_score);
    if score < 50.0 {
        0.0
    } else if score <= 75.0 {
        0.1 + (score - 50.0) / 25.0 * 0.3
    } else {
        0.4 + (score - 75.0) / 25.0 * 0.4
    }
}

/// Weekly tanker trips needed to cover the shortfall
pub fn tanker_demand(stress_score: u32, population: u32) -> u32 {
    let daily_liters = f64::from(population) * need_fraction(stress_score) * DAILY_LITERS_PER_CAPITA;
    let weekly_liters = daily_liters * 7.0;
    (weekly_liters / REFERENCE_TANKER_LITERS).ceil() as u32
}
