//! Forecast service

use chrono::NaiveDate;
use shared::{forecast_all, ForecastResult, RainfallRecord, RiskLevel, Village};

use crate::error::AppResult;
use crate::services::{check_records, check_villages};

pub struct ForecastService;

impl ForecastService {
    pub fn new() -> Self {
        Self
    }

    /// Forecast every village, most at-risk first
    pub fn forecast(
        &self,
        villages: &[Village],
        records: &[RainfallRecord],
        today: NaiveDate,
    ) -> AppResult<Vec<ForecastResult>> {
        check_villages(villages)?;
        check_records(records)?;

        let forecasts = forecast_all(villages, records, today);

        let rising = forecasts.iter().filter(|f| f.risk_level == RiskLevel::Rising).count();
        tracing::info!(
            villages = forecasts.len(),
            records = records.len(),
            rising,
            %today,
            "Computed stress forecasts"
        );

        Ok(forecasts)
    }
}

impl Default for ForecastService {
    fn default() -> Self {
        Self::new()
    }
}
