//! Tanker allocation service: recommendations, auto-assign and plan validation

use serde::{Deserialize, Serialize};
use shared::{
    auto_assign, candidate_plan_from_value, recommend_tankers, validate_coordinates, validate_plan, Assignment,
    GpsCoordinates, PlanValidation, Tanker, TankerRecommendation, Village,
};

use crate::config::AllocationConfig;
use crate::error::{AppError, AppResult};
use crate::services::{check_tankers, check_villages};

/// Result of an auto-assign run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoAssignResponse {
    pub created: Vec<Assignment>,
    pub skipped: Vec<String>,
    pub summary: String,
}

/// Tanker allocation service
pub struct AllocationService {
    config: AllocationConfig,
}

impl AllocationService {
    pub fn new(config: AllocationConfig) -> Self {
        Self { config }
    }

    /// Rank tankers for one village.
    ///
    /// The origin applies only when both source coordinates are present.
    pub fn recommend(
        &self,
        village_id: &str,
        villages: &[Village],
        tankers: &[Tanker],
        source: (Option<f64>, Option<f64>),
        limit: Option<usize>,
    ) -> AppResult<Vec<TankerRecommendation>> {
        check_tankers(tankers)?;

        let village = villages
            .iter()
            .find(|v| v.id == village_id)
            .ok_or_else(|| AppError::NotFound(format!("Village {}", village_id)))?;
        check_villages(std::slice::from_ref(village))?;

        let origin = match source {
            (Some(lat), Some(lng)) => {
                let origin = GpsCoordinates::new(lat, lng);
                validate_coordinates(&origin).map_err(|msg| AppError::invalid("source", msg))?;
                Some(origin)
            }
            _ => None,
        };

        let limit = limit.unwrap_or(self.config.recommendation_limit);
        let recommendations = recommend_tankers(tankers, village.coordinates, origin, limit);

        tracing::debug!(
            village_id = %village.id,
            candidates = tankers.len(),
            returned = recommendations.len(),
            "Ranked tankers"
        );

        Ok(recommendations)
    }

    /// Build a greedy dispatch plan across all villages
    pub fn auto_assign(
        &self,
        villages: &[Village],
        tankers: &[Tanker],
        min_stress_score: Option<u32>,
        max_dispatches: Option<usize>,
    ) -> AppResult<AutoAssignResponse> {
        check_villages(villages)?;
        check_tankers(tankers)?;

        let options = self.config.auto_assign_options(min_stress_score, max_dispatches);
        let result = auto_assign(villages, tankers, options);
        let summary = result.summary();

        for assignment in &result.created {
            tracing::debug!(
                tanker_id = %assignment.tanker_id,
                village_id = %assignment.village_id,
                priority = %assignment.priority,
                trips = assignment.trips_assigned,
                "Assigned tanker"
            );
        }
        if !result.skipped.is_empty() {
            tracing::warn!(skipped = ?result.skipped, "No tanker available for some villages");
        }
        tracing::info!(
            min_stress_score = options.min_stress_score,
            max_new_assignments = options.max_new_assignments,
            "{}",
            summary
        );

        Ok(AutoAssignResponse {
            created: result.created,
            skipped: result.skipped,
            summary,
        })
    }

    /// Sanitize a plan submitted as raw JSON
    pub fn validate_plan(
        &self,
        plan: serde_json::Value,
        villages: &[Village],
        tankers: &[Tanker],
    ) -> AppResult<PlanValidation> {
        check_villages(villages)?;
        check_tankers(tankers)?;

        let candidate = candidate_plan_from_value(plan).map_err(|e| AppError::InvalidPlan(e.to_string()))?;
        let validation = validate_plan(candidate, villages, tankers);
        log_plan_validation(&validation);

        Ok(validation)
    }
}

/// Log what the validator kept and dropped
pub(crate) fn log_plan_validation(validation: &PlanValidation) {
    for dropped in &validation.dropped {
        tracing::debug!(
            index = dropped.index,
            tanker_id = %dropped.tanker_id,
            village_id = %dropped.village_id,
            reason = %dropped.reason,
            "Dropped plan entry"
        );
    }
    tracing::info!(
        accepted = validation.plan.assignments.len(),
        dropped = validation.dropped.len(),
        "Validated dispatch plan"
    );
}
