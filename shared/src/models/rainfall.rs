//! Daily rainfall observations

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of rainfall for one village
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RainfallRecord {
    pub village_id: String,
    pub date: NaiveDate,
    pub rain_mm: f64,
}

/// Sum of a village's rainfall over the trailing window ending at `today`.
///
/// Records dated in the future are ignored.
pub fn recent_rainfall_total(records: &[RainfallRecord], today: NaiveDate, window_days: i64) -> f64 {
    records
        .iter()
        .filter(|r| {
            let days_ago = (today - r.date).num_days();
            (0..window_days).contains(&days_ago)
        })
        .map(|r| r.rain_mm)
        .sum()
}
