//! Tanker scoring and greedy dispatch planning

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{Assignment, AutoAssignResult, Priority, Tanker, TankerRecommendation, Village};
use crate::types::{round_half_up, round_to, GpsCoordinates};

/// Average tanker speed used for travel-time estimates
pub const AVERAGE_SPEED_KMH: f64 = 40.0;

/// Distance at which the proximity score reaches zero
pub const PROXIMITY_RANGE_KM: f64 = 100.0;

/// Capacity at which the capacity score saturates
pub const CAPACITY_REFERENCE_LITERS: f64 = 15_000.0;

pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;
pub const DEFAULT_MIN_STRESS_SCORE: u32 = 70;
pub const DEFAULT_MAX_NEW_ASSIGNMENTS: usize = 10;

/// Score a tanker against a target.
///
/// `origin` overrides the depot when the tanker fills up at an intermediate
/// water source first.
pub fn score_tanker(
    tanker: &Tanker,
    target: GpsCoordinates,
    origin: Option<GpsCoordinates>,
) -> TankerRecommendation {
    let origin = origin.unwrap_or(tanker.depot);
    let distance = origin.distance_km(&target);
    let estimated_minutes = round_half_up(distance / AVERAGE_SPEED_KMH * 60.0) as u32;

    let proximity_score = (100.0 - distance / PROXIMITY_RANGE_KM * 100.0).max(0.0);
    let capacity_score = (f64::from(tanker.capacity_liters) / CAPACITY_REFERENCE_LITERS * 100.0).min(100.0);
    let status_score = if tanker.is_available() { 100.0 } else { 0.0 };

    let score = round_half_up(proximity_score * 0.6 + capacity_score * 0.2 + status_score * 0.2) as u32;

    TankerRecommendation {
        tanker_id: tanker.id.clone(),
        registration_no: tanker.registration_no.clone(),
        distance_km: round_to(distance, 1),
        estimated_minutes,
        proximity_score,
        capacity_score,
        status_score,
        score,
    }
}

/// Rank the available tankers for a target, best first.
///
/// Ties keep input order.
pub fn recommend_tankers(
    tankers: &[Tanker],
    target: GpsCoordinates,
    origin: Option<GpsCoordinates>,
    limit: usize,
) -> Vec<TankerRecommendation> {
    let mut ranked: Vec<TankerRecommendation> = tankers
        .iter()
        .filter(|t| t.is_available())
        .map(|t| score_tanker(t, target, origin))
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(limit);
    ranked
}

/// Parameters for an auto-assign run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AutoAssignOptions {
    /// Villages below this score are not considered
    pub min_stress_score: u32,
    /// Upper bound on assignments created in one run
    pub max_new_assignments: usize,
}

impl Default for AutoAssignOptions {
    fn default() -> Self {
        Self {
            min_stress_score: DEFAULT_MIN_STRESS_SCORE,
            max_new_assignments: DEFAULT_MAX_NEW_ASSIGNMENTS,
        }
    }
}

/// Villages that may receive a new dispatch, highest stress first
pub fn eligible_villages(villages: &[Village], min_stress_score: u32) -> Vec<&Village> {
    let mut eligible: Vec<&Village> = villages
        .iter()
        .filter(|v| !v.has_active_dispatch && v.stress_score >= min_stress_score)
        .collect();
    eligible.sort_by(|a, b| b.stress_score.cmp(&a.stress_score));
    eligible
}

/// Greedily pair the neediest villages with their best remaining tanker.
///
/// Each village takes the top-ranked tanker not yet used in this run, so the
/// result is locally optimal per village rather than globally optimal. No
/// tanker and no village appears twice in `created`.
pub fn auto_assign(villages: &[Village], tankers: &[Tanker], options: AutoAssignOptions) -> AutoAssignResult {
    let mut result = AutoAssignResult::default();
    let mut used_tankers: HashSet<&str> = HashSet::new();
    let mut used_villages: HashSet<&str> = HashSet::new();

    for village in eligible_villages(villages, options.min_stress_score) {
        if result.created.len() >= options.max_new_assignments {
            break;
        }
        if used_villages.contains(village.id.as_str()) {
            continue;
        }

        let pool: Vec<Tanker> = tankers
            .iter()
            .filter(|t| !used_tankers.contains(t.id.as_str()))
            .cloned()
            .collect();
        if pool.is_empty() {
            break;
        }

        let recommendations = recommend_tankers(&pool, village.coordinates, None, DEFAULT_RECOMMENDATION_LIMIT);
        let Some(best) = recommendations.into_iter().next() else {
            result.skipped.push(village.name.clone());
            continue;
        };

        let Some(tanker) = tankers.iter().find(|t| t.id == best.tanker_id) else {
            result.skipped.push(village.name.clone());
            continue;
        };

        used_tankers.insert(tanker.id.as_str());
        used_villages.insert(village.id.as_str());

        result.created.push(Assignment {
            tanker_id: best.tanker_id,
            tanker_registration: best.registration_no,
            village_id: village.id.clone(),
            village_name: village.name.clone(),
            trips_assigned: village.tanker_demand.max(1),
            priority: Priority::from_stress(village.stress_score),
            score: Some(best.score),
            reasoning: None,
            estimated_distance_km: best.distance_km,
        });
    }

    result
}
