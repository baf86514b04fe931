//! AI-assisted dispatch planning
//!
//! Builds the generator prompt from the request snapshots, asks the external
//! generator for a plan and always passes the answer through the validator.

use serde::{Deserialize, Serialize};
use shared::{
    build_optimizer_prompt, validate_plan, DispatchPlan, PlanValidation, StressLevel, Tanker, Village, WaterSource,
};

use crate::error::{AppError, AppResult};
use crate::external::OptimizerClient;
use crate::services::allocation::log_plan_validation;
use crate::services::{check_tankers, check_villages};

/// Situation the plan was generated for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptimizerContext {
    pub total_villages: usize,
    pub critical_villages: usize,
    pub unserved_villages: usize,
    pub available_tankers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeResponse {
    #[serde(flatten)]
    pub validation: PlanValidation,
    pub context: OptimizerContext,
}

pub struct OptimizerService {
    client: Option<OptimizerClient>,
    candidate_min_stress: u32,
}

impl OptimizerService {
    pub fn new(client: Option<OptimizerClient>, candidate_min_stress: u32) -> Self {
        Self {
            client,
            candidate_min_stress,
        }
    }

    pub async fn optimize(
        &self,
        villages: &[Village],
        tankers: &[Tanker],
        water_sources: &[WaterSource],
    ) -> AppResult<OptimizeResponse> {
        check_villages(villages)?;
        check_tankers(tankers)?;

        let mut candidates: Vec<Village> = villages
            .iter()
            .filter(|v| v.stress_score >= self.candidate_min_stress)
            .cloned()
            .collect();
        candidates.sort_by(|a, b| b.stress_score.cmp(&a.stress_score));
        let available: Vec<Tanker> = tankers.iter().filter(|t| t.is_available()).cloned().collect();

        let context = OptimizerContext {
            total_villages: candidates.len(),
            critical_villages: candidates
                .iter()
                .filter(|v| v.stress_level() == StressLevel::Critical)
                .count(),
            unserved_villages: candidates.iter().filter(|v| !v.has_active_dispatch).count(),
            available_tankers: available.len(),
        };

        if available.is_empty() {
            tracing::info!("No available tankers, skipping plan generation");
            return Ok(OptimizeResponse {
                validation: PlanValidation {
                    plan: DispatchPlan {
                        summary: "No available tankers for dispatch.".to_string(),
                        assignments: Vec::new(),
                    },
                    dropped: Vec::new(),
                },
                context,
            });
        }

        let client = self.client.as_ref().ok_or(AppError::OptimizerUnavailable)?;

        let prompt = build_optimizer_prompt(&candidates, &available, water_sources);
        tracing::info!(
            model = client.model(),
            villages = context.total_villages,
            tankers = context.available_tankers,
            "Requesting plan from generator"
        );

        let candidate = client.generate_plan(&prompt).await.map_err(|e| {
            tracing::warn!("Plan generation failed: {}", e);
            e
        })?;
        tracing::debug!(proposed = candidate.assignments.len(), "Generator proposed plan");

        let validation = validate_plan(candidate, &candidates, &available);
        log_plan_validation(&validation);

        Ok(OptimizeResponse { validation, context })
    }
}
