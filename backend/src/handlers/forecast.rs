//! Forecast handlers

use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use shared::{ForecastResult, RainfallRecord, Village};

use crate::error::AppResult;
use crate::services::ForecastService;

#[derive(Deserialize)]
pub struct ForecastRequest {
    pub villages: Vec<Village>,
    #[serde(default)]
    pub records: Vec<RainfallRecord>,
    /// Reference date, defaults to the current UTC date
    pub today: Option<NaiveDate>,
}

/// Forecast stress for every village, rising risk first
pub async fn forecast_villages(Json(request): Json<ForecastRequest>) -> AppResult<Json<Vec<ForecastResult>>> {
    let today = request.today.unwrap_or_else(|| Utc::now().date_naive());
    let forecasts = ForecastService::new().forecast(&request.villages, &request.records, today)?;
    Ok(Json(forecasts))
}
