//! Stress assessment service

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{compute_stress, recent_rainfall_total, validate_stress_inputs, RainfallRecord, StressAssessment, Village};

use crate::error::{AppError, AppResult};
use crate::services::{check_records, check_villages};

/// Raw inputs for a one-off stress assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressInputs {
    pub recent_rainfall_mm: f64,
    pub historical_avg_rainfall_mm: f64,
    pub groundwater_depth_m: f64,
    pub population: u32,
}

/// Stress assessment service
pub struct StressService {
    window_days: i64,
}

impl StressService {
    /// `window_days` is how many days of records count as recent rainfall
    pub fn new(window_days: i64) -> Self {
        Self { window_days }
    }

    pub fn assess(&self, inputs: &StressInputs) -> AppResult<StressAssessment> {
        validate_stress_inputs(
            inputs.recent_rainfall_mm,
            inputs.historical_avg_rainfall_mm,
            inputs.groundwater_depth_m,
        )
        .map_err(|msg| AppError::ValidationError(msg.to_string()))?;

        Ok(compute_stress(
            inputs.recent_rainfall_mm,
            inputs.historical_avg_rainfall_mm,
            inputs.groundwater_depth_m,
            inputs.population,
        ))
    }

    /// Recompute every village's score from its recent daily records
    pub fn refresh_scores(
        &self,
        mut villages: Vec<Village>,
        records: &[RainfallRecord],
        today: NaiveDate,
    ) -> AppResult<Vec<Village>> {
        check_villages(&villages)?;
        check_records(records)?;

        let mut by_village: HashMap<&str, Vec<RainfallRecord>> = HashMap::new();
        for record in records {
            by_village
                .entry(record.village_id.as_str())
                .or_default()
                .push(record.clone());
        }

        let mut changed = 0usize;
        for village in villages.iter_mut() {
            let series = by_village.get(village.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            let recent = recent_rainfall_total(series, today, self.window_days);
            let previous = village.stress_score;
            let assessment = village.refresh_stress(recent);

            if assessment.stress_score != previous {
                changed += 1;
                tracing::debug!(
                    village_id = %village.id,
                    previous,
                    current = assessment.stress_score,
                    "Stress score changed"
                );
            }
        }

        tracing::info!(
            villages = villages.len(),
            changed,
            window_days = self.window_days,
            "Refreshed stress scores"
        );

        Ok(villages)
    }
}
