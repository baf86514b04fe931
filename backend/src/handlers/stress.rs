//! Stress assessment handlers

use axum::{extract::State, Json};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use shared::{RainfallRecord, StressAssessment, Village};

use crate::error::AppResult;
use crate::services::stress::{StressInputs, StressService};
use crate::AppState;

#[derive(Deserialize)]
pub struct RefreshScoresRequest {
    pub villages: Vec<Village>,
    #[serde(default)]
    pub records: Vec<RainfallRecord>,
    /// Reference date, defaults to the current UTC date
    pub today: Option<NaiveDate>,
}

/// Assess stress from raw inputs
pub async fn assess_stress(
    State(state): State<AppState>,
    Json(inputs): Json<StressInputs>,
) -> AppResult<Json<StressAssessment>> {
    let service = StressService::new(state.config.forecast.refresh_window_days);
    let assessment = service.assess(&inputs)?;
    Ok(Json(assessment))
}

/// Recompute village scores from recent daily rainfall
pub async fn refresh_scores(
    State(state): State<AppState>,
    Json(request): Json<RefreshScoresRequest>,
) -> AppResult<Json<Vec<Village>>> {
    let service = StressService::new(state.config.forecast.refresh_window_days);
    let today = request.today.unwrap_or_else(|| Utc::now().date_naive());
    let villages = service.refresh_scores(request.villages, &request.records, today)?;
    Ok(Json(villages))
}
