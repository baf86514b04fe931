//! Rainfall trend and stress forecast models

use serde::{Deserialize, Serialize};

/// Direction of recent rainfall
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RainfallTrend {
    Declining,
    Stable,
    Improving,
}

impl RainfallTrend {
    /// Percentage points added to the rainfall deviation when projecting
    pub fn deviation_shift(&self) -> f64 {
        match self {
            RainfallTrend::Declining => -10.0,
            RainfallTrend::Improving => 8.0,
            RainfallTrend::Stable => 0.0,
        }
    }
}

impl std::fmt::Display for RainfallTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RainfallTrend::Declining => write!(f, "declining"),
            RainfallTrend::Stable => write!(f, "stable"),
            RainfallTrend::Improving => write!(f, "improving"),
        }
    }
}

/// Direction of projected stress.
///
/// Variant order is the display order: rising villages come first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Rising,
    Steady,
    Falling,
}

impl RiskLevel {
    pub fn from_delta(score_delta: i64) -> Self {
        if score_delta > 3 {
            RiskLevel::Rising
        } else if score_delta < -3 {
            RiskLevel::Falling
        } else {
            RiskLevel::Steady
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Rising => write!(f, "rising"),
            RiskLevel::Steady => write!(f, "steady"),
            RiskLevel::Falling => write!(f, "falling"),
        }
    }
}

/// Weekly rainfall analysis over the last 28 days
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendResult {
    /// Index 0 is the oldest week, index 3 the most recent
    pub weekly_totals: [f64; 4],
    /// Trailing 7-day mean, one value per day from the seventh record on
    pub moving_avg_7d: Vec<f64>,
    pub trend: RainfallTrend,
}

/// Projected stress for one village
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StressProjection {
    pub projected_score: u32,
    pub projected_demand: u32,
    pub risk_level: RiskLevel,
}

/// Forecast row for one village
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastResult {
    pub village_id: String,
    pub village_name: String,
    pub district: String,
    pub current_score: u32,
    pub projected_score: u32,
    pub current_demand: u32,
    pub projected_demand: u32,
    pub risk_level: RiskLevel,
    pub trend: RainfallTrend,
    /// Oldest week first
    pub weekly_rainfall: [f64; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_thresholds() {
        assert_eq!(RiskLevel::from_delta(4), RiskLevel::Rising);
        assert_eq!(RiskLevel::from_delta(3), RiskLevel::Steady);
        assert_eq!(RiskLevel::from_delta(0), RiskLevel::Steady);
        assert_eq!(RiskLevel::from_delta(-3), RiskLevel::Steady);
        assert_eq!(RiskLevel::from_delta(-4), RiskLevel::Falling);
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Rising < RiskLevel::Steady);
        assert!(RiskLevel::Steady < RiskLevel::Falling);
    }
}
