//! Dispatch allocation handlers

use axum::{extract::State, Json};
use serde::Deserialize;
use shared::{PlanValidation, Tanker, TankerRecommendation, Village, WaterSource};

use crate::error::AppResult;
use crate::services::allocation::{AllocationService, AutoAssignResponse};
use crate::services::optimizer::{OptimizeResponse, OptimizerService};
use crate::AppState;

#[derive(Deserialize)]
pub struct RecommendRequest {
    pub village_id: String,
    pub villages: Vec<Village>,
    pub tankers: Vec<Tanker>,
    pub source_lat: Option<f64>,
    pub source_lng: Option<f64>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct AutoAssignRequest {
    pub villages: Vec<Village>,
    pub tankers: Vec<Tanker>,
    pub min_stress_score: Option<u32>,
    pub max_dispatches: Option<usize>,
}

#[derive(Deserialize)]
pub struct ValidatePlanRequest {
    /// Kept as raw JSON so shape errors surface as INVALID_PLAN
    pub plan: serde_json::Value,
    pub villages: Vec<Village>,
    pub tankers: Vec<Tanker>,
}

#[derive(Deserialize)]
pub struct OptimizeRequest {
    pub villages: Vec<Village>,
    pub tankers: Vec<Tanker>,
    #[serde(default)]
    pub water_sources: Vec<WaterSource>,
}

/// Rank tankers for one village
pub async fn recommend_tankers(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Json<Vec<TankerRecommendation>>> {
    let service = AllocationService::new(state.config.allocation.clone());
    let recommendations = service.recommend(
        &request.village_id,
        &request.villages,
        &request.tankers,
        (request.source_lat, request.source_lng),
        request.limit,
    )?;
    Ok(Json(recommendations))
}

/// Greedily assign tankers to the most stressed villages
pub async fn auto_assign(
    State(state): State<AppState>,
    Json(request): Json<AutoAssignRequest>,
) -> AppResult<Json<AutoAssignResponse>> {
    let service = AllocationService::new(state.config.allocation.clone());
    let result = service.auto_assign(
        &request.villages,
        &request.tankers,
        request.min_stress_score,
        request.max_dispatches,
    )?;
    Ok(Json(result))
}

/// Sanitize an externally produced plan
pub async fn validate_plan(
    State(state): State<AppState>,
    Json(request): Json<ValidatePlanRequest>,
) -> AppResult<Json<PlanValidation>> {
    let service = AllocationService::new(state.config.allocation.clone());
    let validation = service.validate_plan(request.plan, &request.villages, &request.tankers)?;
    Ok(Json(validation))
}

/// Ask the plan generator for a dispatch plan and validate it
pub async fn ai_optimize(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> AppResult<Json<OptimizeResponse>> {
    let service = OptimizerService::new(state.optimizer.clone(), state.config.optimizer.candidate_min_stress);
    let response = service
        .optimize(&request.villages, &request.tankers, &request.water_sources)
        .await?;
    Ok(Json(response))
}
