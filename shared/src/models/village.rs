//! Village models

use serde::{Deserialize, Serialize};

use crate::stress::{compute_stress, StressAssessment};
use crate::types::GpsCoordinates;

/// Snapshot of a village supplied by the persistence layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Village {
    /// Village code (e.g. `VIL-001`)
    pub id: String,
    pub name: String,
    pub district: String,
    pub coordinates: GpsCoordinates,
    pub population: u32,
    /// 0-100, always the output of the stress model
    pub stress_score: u32,
    /// Signed percent deviation from the historical baseline
    pub rainfall_deviation: f64,
    /// Meters below ground level
    pub groundwater_depth_m: f64,
    /// Historical rainfall for the comparison period, in mm
    pub historical_avg_rainfall_mm: f64,
    /// Estimated tanker trips per week
    pub tanker_demand: u32,
    #[serde(default)]
    pub has_active_dispatch: bool,
}

impl Village {
    /// Recompute stress score, deviation and demand from a new rainfall reading
    pub fn refresh_stress(&mut self, recent_rainfall_mm: f64) -> StressAssessment {
        let assessment = compute_stress(
            recent_rainfall_mm,
            self.historical_avg_rainfall_mm,
            self.groundwater_depth_m,
            self.population,
        );
        self.stress_score = assessment.stress_score;
        self.rainfall_deviation = assessment.rainfall_deviation;
        self.tanker_demand = assessment.tanker_demand;
        assessment
    }

    pub fn stress_level(&self) -> StressLevel {
        StressLevel::from_score(self.stress_score)
    }
}

/// Dashboard stress band
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StressLevel {
    /// Below 50
    Safe,
    /// 50-75
    Warning,
    /// Above 75
    Critical,
}

impl StressLevel {
    pub fn from_score(score: u32) -> Self {
        if score < 50 {
            StressLevel::Safe
        } else if score <= 75 {
            StressLevel::Warning
        } else {
            StressLevel::Critical
        }
    }
}

impl std::fmt::Display for StressLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StressLevel::Safe => write!(f, "safe"),
            StressLevel::Warning => write!(f, "warning"),
            StressLevel::Critical => write!(f, "critical"),
        }
    }
}

/// Kind of bulk water source
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WaterSourceKind {
    Dam,
    Reservoir,
    Borewell,
    River,
}

impl std::fmt::Display for WaterSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaterSourceKind::Dam => write!(f, "dam"),
            WaterSourceKind::Reservoir => write!(f, "reservoir"),
            WaterSourceKind::Borewell => write!(f, "borewell"),
            WaterSourceKind::River => write!(f, "river"),
        }
    }
}

/// A filling point tankers can draw from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaterSource {
    pub name: String,
    pub kind: WaterSourceKind,
    pub coordinates: GpsCoordinates,
    /// Million liters
    pub capacity_ml: f64,
    /// Percent full (0-100)
    pub current_level_percent: f64,
    pub district: String,
}
