//! Externally generated dispatch plans
//!
//! A plan generator (an LLM behind the backend's optimizer client) proposes
//! tanker-to-village assignments. Nothing it returns is trusted: the text is
//! parsed into [`CandidatePlan`] and then [`validate_plan`] re-applies the
//! same exclusivity and eligibility rules the greedy planner enforces.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::{
    Assignment, CandidatePlan, DispatchPlan, DropReason, DroppedAssignment, Priority, ProposedAssignment,
    StressLevel, Tanker, Village, WaterSource,
};
use crate::types::round_to;

/// Why a generator response could not be read as a plan
#[derive(Debug, Error)]
pub enum PlanParseError {
    #[error("Plan is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Plan has no summary")]
    MissingSummary,

    #[error("Plan has no assignments array")]
    MissingAssignments,
}

#[derive(Deserialize)]
struct RawPlan {
    summary: Option<String>,
    assignments: Option<Vec<Value>>,
}

/// Parse generator output into a candidate plan.
///
/// Fields the generator adds beyond the known shape, including any distance
/// it claims, are discarded here. Entries are read one at a time; an entry
/// that cannot be read is recorded in [`CandidatePlan::malformed`] instead of
/// failing the whole plan.
pub fn parse_candidate_plan(text: &str) -> Result<CandidatePlan, PlanParseError> {
    candidate_from_raw(serde_json::from_str(text)?)
}

/// Same as [`parse_candidate_plan`] for a plan already decoded as JSON
pub fn candidate_plan_from_value(value: Value) -> Result<CandidatePlan, PlanParseError> {
    candidate_from_raw(serde_json::from_value(value)?)
}

fn candidate_from_raw(raw: RawPlan) -> Result<CandidatePlan, PlanParseError> {
    let summary = raw
        .summary
        .filter(|s| !s.trim().is_empty())
        .ok_or(PlanParseError::MissingSummary)?;
    let entries = raw.assignments.ok_or(PlanParseError::MissingAssignments)?;

    let mut assignments = Vec::with_capacity(entries.len());
    let mut malformed = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        match proposal_from_value(entry) {
            Some(proposed) => assignments.push(proposed),
            None => malformed.push(index),
        }
    }

    Ok(CandidatePlan {
        summary,
        assignments,
        malformed,
    })
}

/// Read one generator entry.
///
/// `tankerId` and `villageId` must be strings. Any other field with the wrong
/// type is treated as absent, so a non-string priority falls back to the
/// stress tier during validation.
fn proposal_from_value(entry: &Value) -> Option<ProposedAssignment> {
    let object = entry.as_object()?;
    let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);

    Some(ProposedAssignment {
        tanker_id: text("tankerId")?,
        tanker_reg: text("tankerReg").unwrap_or_default(),
        village_id: text("villageId")?,
        village_name: text("villageName").unwrap_or_default(),
        priority: text("priority"),
        reasoning: text("reasoning"),
    })
}

/// Sanitized plan plus an account of every entry that was rejected
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanValidation {
    pub plan: DispatchPlan,
    pub dropped: Vec<DroppedAssignment>,
}

/// Filter and correct a candidate plan against the authoritative snapshots.
///
/// Entries are checked in order and the first occurrence of a tanker or
/// village wins. Unreadable entries are dropped at their original position. Surviving entries get their distance recomputed from the
/// depot and an unrecognized priority replaced by the stress-derived tier.
/// The summary passes through unchanged.
pub fn validate_plan(candidate: CandidatePlan, villages: &[Village], tankers: &[Tanker]) -> PlanValidation {
    let tanker_map: HashMap<&str, &Tanker> = tankers.iter().map(|t| (t.id.as_str(), t)).collect();
    let village_map: HashMap<&str, &Village> = villages.iter().map(|v| (v.id.as_str(), v)).collect();

    let mut used_tankers: HashSet<String> = HashSet::new();
    let mut used_villages: HashSet<String> = HashSet::new();
    let mut assignments = Vec::new();
    let mut dropped = Vec::new();

    let malformed: HashSet<usize> = candidate.malformed.iter().copied().collect();
    let total = candidate.assignments.len() + malformed.len();
    let mut proposals = candidate.assignments.into_iter();

    for index in 0..total {
        if malformed.contains(&index) {
            dropped.push(DroppedAssignment {
                index,
                tanker_id: String::new(),
                village_id: String::new(),
                reason: DropReason::Malformed,
            });
            continue;
        }
        let Some(proposed) = proposals.next() else {
            continue;
        };

        let checked = check_entry(&proposed, &tanker_map, &village_map, &used_tankers, &used_villages);
        let (tanker, village) = match checked {
            Ok(pair) => pair,
            Err(reason) => {
                dropped.push(DroppedAssignment {
                    index,
                    tanker_id: proposed.tanker_id,
                    village_id: proposed.village_id,
                    reason,
                });
                continue;
            }
        };

        used_tankers.insert(tanker.id.clone());
        used_villages.insert(village.id.clone());

        let priority = proposed
            .priority
            .as_deref()
            .and_then(|p| p.parse::<Priority>().ok())
            .unwrap_or_else(|| Priority::from_stress(village.stress_score));

        assignments.push(Assignment {
            tanker_id: tanker.id.clone(),
            tanker_registration: tanker.registration_no.clone(),
            village_id: village.id.clone(),
            village_name: village.name.clone(),
            trips_assigned: village.tanker_demand.max(1),
            priority,
            score: None,
            reasoning: proposed.reasoning.filter(|r| !r.trim().is_empty()),
            estimated_distance_km: round_to(tanker.depot.distance_km(&village.coordinates), 1),
        });
    }

    PlanValidation {
        plan: DispatchPlan {
            summary: candidate.summary,
            assignments,
        },
        dropped,
    }
}

fn check_entry<'a>(
    proposed: &ProposedAssignment,
    tanker_map: &HashMap<&str, &'a Tanker>,
    village_map: &HashMap<&str, &'a Village>,
    used_tankers: &HashSet<String>,
    used_villages: &HashSet<String>,
) -> Result<(&'a Tanker, &'a Village), DropReason> {
    let tanker = tanker_map
        .get(proposed.tanker_id.as_str())
        .copied()
        .ok_or(DropReason::UnknownTanker)?;
    let village = village_map
        .get(proposed.village_id.as_str())
        .copied()
        .ok_or(DropReason::UnknownVillage)?;

    if village.has_active_dispatch {
        return Err(DropReason::VillageAlreadyServed);
    }
    if !tanker.is_available() {
        return Err(DropReason::TankerUnavailable);
    }
    if used_tankers.contains(&tanker.id) {
        return Err(DropReason::DuplicateTanker);
    }
    if used_villages.contains(&village.id) {
        return Err(DropReason::DuplicateVillage);
    }
    Ok((tanker, village))
}

/// System and user messages for the plan generator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizerPrompt {
    pub system: String,
    pub user: String,
}

const OPTIMIZER_SYSTEM_PROMPT: &str = r#"You plan water tanker dispatches for a drought relief operation in Maharashtra.

Given water-stressed villages and available tankers, return a dispatch plan that serves the most stressed villages first while keeping travel distance low.

Constraints:
- A tanker serves at most ONE village, and a village receives at most ONE tanker.
- Stress above 75 is critical, 50 to 75 is warning.
- Among critical villages, larger populations come first.
- Prefer the tanker whose depot is closest to the village.
- Skip villages that already have an active dispatch.
- Use only tankers from the list you are given.
- Priority is "urgent" above 75 stress, "high" above 60, "medium" above 40, otherwise "low".

Respond with JSON only, in exactly this shape:
{
  "summary": "Two or three sentences on the strategy",
  "assignments": [
    {
      "tankerId": "tanker id from the list",
      "tankerReg": "registration number",
      "villageId": "village id from the list",
      "villageName": "village name",
      "priority": "urgent|high|medium|low",
      "reasoning": "One sentence on why this tanker fits this village",
      "estimatedDistance": <km>
    }
  ]
}

When nothing can be assigned, answer { "summary": "No assignments possible: <reason>", "assignments": [] }"#;

/// Describe the current situation for the plan generator
pub fn build_optimizer_prompt(villages: &[Village], tankers: &[Tanker], water_sources: &[WaterSource]) -> OptimizerPrompt {
    let critical = villages
        .iter()
        .filter(|v| v.stress_level() == StressLevel::Critical)
        .count();
    let unserved = villages.iter().filter(|v| !v.has_active_dispatch).count();

    let mut lines = vec![
        "Current situation:".to_string(),
        format!("- {} villages with stress score >= 50", villages.len()),
        format!("- {} critical (stress > 75)", critical),
        format!("- {} without an active dispatch", unserved),
        format!("- {} tankers available", tankers.len()),
        String::new(),
        "VILLAGES:".to_string(),
    ];

    lines.extend(villages.iter().map(|v| {
        format!(
            "- {} ({}) | ID: {} | Stress: {} | Pop: {} | Demand: {} trips/wk | Lat: {}, Lng: {} | Active dispatch: {}",
            v.name,
            v.district,
            v.id,
            v.stress_score,
            v.population,
            v.tanker_demand,
            v.coordinates.latitude,
            v.coordinates.longitude,
            v.has_active_dispatch
        )
    }));

    lines.push(String::new());
    lines.push("TANKERS:".to_string());
    lines.extend(tankers.iter().map(|t| {
        format!(
            "- {} | ID: {} | Capacity: {}L | Depot: {} ({}, {}) | Driver: {}",
            t.registration_no,
            t.id,
            t.capacity_liters,
            t.depot_location,
            t.depot.latitude,
            t.depot.longitude,
            t.driver_name.as_deref().unwrap_or("unassigned")
        )
    }));

    lines.push(String::new());
    lines.push("WATER SOURCES:".to_string());
    if water_sources.is_empty() {
        lines.push("None available".to_string());
    }
    lines.extend(water_sources.iter().map(|s| {
        format!(
            "- {} {} ({}) | Capacity: {}ML | Level: {}% | Lat: {}, Lng: {}",
            s.name,
            s.kind,
            s.district,
            s.capacity_ml,
            s.current_level_percent,
            s.coordinates.latitude,
            s.coordinates.longitude
        )
    }));

    lines.push(String::new());
    lines.push("Produce the dispatch plan.".to_string());
    let user = lines.join("\n");

    OptimizerPrompt {
        system: OPTIMIZER_SYSTEM_PROMPT.to_string(),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TankerStatus, WaterSourceKind};
    use crate::types::GpsCoordinates;

    fn village(id: &str, stress: u32, lat: f64) -> Village {
        Village {
            id: id.to_string(),
            name: format!("Village {}", id),
            district: "Latur".to_string(),
            coordinates: GpsCoordinates::new(lat, 76.5),
            population: 8_000,
            stress_score: stress,
            rainfall_deviation: -40.0,
            groundwater_depth_m: 14.0,
            historical_avg_rainfall_mm: 120.0,
            tanker_demand: 6,
            has_active_dispatch: false,
        }
    }

    fn tanker(id: &str, status: TankerStatus) -> Tanker {
        Tanker {
            id: id.to_string(),
            registration_no: format!("MH-24-{}", id),
            driver_name: None,
            capacity_liters: 12_000,
            depot_location: "Latur".to_string(),
            depot: GpsCoordinates::new(18.4, 76.5),
            status,
        }
    }

    fn proposed(tanker_id: &str, village_id: &str, priority: Option<&str>) -> ProposedAssignment {
        ProposedAssignment {
            tanker_id: tanker_id.to_string(),
            tanker_reg: "made-up".to_string(),
            village_id: village_id.to_string(),
            village_name: "made-up".to_string(),
            priority: priority.map(str::to_string),
            reasoning: Some("closest depot".to_string()),
        }
    }

    mod parsing {
        use super::*;

        #[test]
        fn test_parse_valid_plan_drops_claimed_distance() {
            let text = r#"{
                "summary": "Serve Ausa first",
                "assignments": [
                    {"tankerId": "t1", "tankerReg": "MH-24-t1", "villageId": "v1",
                     "villageName": "Ausa", "priority": "urgent",
                     "reasoning": "nearest", "estimatedDistance": 0.5}
                ]
            }"#;
            let plan = parse_candidate_plan(text).unwrap();
            assert_eq!(plan.summary, "Serve Ausa first");
            assert_eq!(plan.assignments.len(), 1);
            assert_eq!(plan.assignments[0].tanker_id, "t1");
            assert_eq!(plan.assignments[0].priority.as_deref(), Some("urgent"));
        }

        #[test]
        fn test_parse_rejects_malformed_json() {
            assert!(matches!(
                parse_candidate_plan("not json"),
                Err(PlanParseError::Malformed(_))
            ));
        }

        #[test]
        fn test_parse_requires_summary() {
            assert!(matches!(
                parse_candidate_plan(r#"{"assignments": []}"#),
                Err(PlanParseError::MissingSummary)
            ));
            assert!(matches!(
                parse_candidate_plan(r#"{"summary": "  ", "assignments": []}"#),
                Err(PlanParseError::MissingSummary)
            ));
        }

        #[test]
        fn test_parse_requires_assignments() {
            assert!(matches!(
                parse_candidate_plan(r#"{"summary": "nothing"}"#),
                Err(PlanParseError::MissingAssignments)
            ));
        }

        #[test]
        fn test_plan_from_value() {
            let value = serde_json::json!({
                "summary": "s",
                "assignments": [{"tankerId": "t1", "villageId": "v1", "priority": "low"}]
            });
            let plan = candidate_plan_from_value(value).unwrap();
            assert_eq!(plan.assignments[0].village_id, "v1");

            assert!(matches!(
                candidate_plan_from_value(serde_json::json!({"summary": "s", "assignments": 3})),
                Err(PlanParseError::Malformed(_))
            ));
        }

        #[test]
        fn test_parse_tolerates_null_priority() {
            let text = r#"{"summary": "s", "assignments": [{"tankerId": "t1", "villageId": "v1", "priority": null}]}"#;
            let plan = parse_candidate_plan(text).unwrap();
            assert_eq!(plan.assignments[0].priority, None);
        }

        #[test]
        fn test_wrong_typed_fields_are_treated_as_absent() {
            let text = r#"{"summary": "s", "assignments": [
                {"tankerId": "t1", "villageId": "v1", "priority": "urgent"},
                {"tankerId": "t2", "villageId": "v2", "priority": 2, "reasoning": 7, "tankerReg": false}
            ]}"#;
            let plan = parse_candidate_plan(text).unwrap();
            assert_eq!(plan.assignments.len(), 2);
            assert!(plan.malformed.is_empty());
            assert_eq!(plan.assignments[1].priority, None);
            assert_eq!(plan.assignments[1].reasoning, None);
            assert_eq!(plan.assignments[1].tanker_reg, "");
        }

        #[test]
        fn test_unreadable_entries_keep_their_position() {
            let text = r#"{"summary": "s", "assignments": [
                {"tankerId": "t1", "villageId": "v1"},
                "oops",
                {"tankerId": 4, "villageId": "v2"},
                {"tankerId": "t3", "villageId": "v3"}
            ]}"#;
            let plan = parse_candidate_plan(text).unwrap();
            assert_eq!(plan.malformed, vec![1, 2]);
            let ids: Vec<&str> = plan.assignments.iter().map(|a| a.tanker_id.as_str()).collect();
            assert_eq!(ids, vec!["t1", "t3"]);
        }
    }

    mod validation {
        use super::*;

        #[test]
        fn test_valid_entry_is_corrected_from_snapshots() {
            let villages = vec![village("v1", 80, 18.5)];
            let tankers = vec![tanker("t1", TankerStatus::Available)];
            let candidate = CandidatePlan::new(
                "one trip".to_string(),
                vec![proposed("t1", "v1", Some("high"))],
            );

            let result = validate_plan(candidate, &villages, &tankers);
            assert!(result.dropped.is_empty());
            assert_eq!(result.plan.summary, "one trip");

            let a = &result.plan.assignments[0];
            assert_eq!(a.tanker_registration, "MH-24-t1");
            assert_eq!(a.village_name, "Village v1");
            assert_eq!(a.priority, Priority::High);
            assert_eq!(a.trips_assigned, 6);
            // 0.1 degree of latitude
            assert_eq!(a.estimated_distance_km, 11.1);
        }

        #[test]
        fn test_unknown_priority_falls_back_to_stress_tier() {
            let villages = vec![village("v1", 80, 18.5), village("v2", 65, 18.6), village("v3", 55, 18.7)];
            let tankers = vec![
                tanker("t1", TankerStatus::Available),
                tanker("t2", TankerStatus::Available),
                tanker("t3", TankerStatus::Available),
            ];
            let candidate = CandidatePlan::new(
                "s".to_string(),
                vec![
                    proposed("t1", "v1", Some("critical")),
                    proposed("t2", "v2", Some("URGENT")),
                    proposed("t3", "v3", None),
                ],
            );

            let result = validate_plan(candidate, &villages, &tankers);
            let priorities: Vec<Priority> = result.plan.assignments.iter().map(|a| a.priority).collect();
            assert_eq!(priorities, vec![Priority::Urgent, Priority::High, Priority::Medium]);
        }

        #[test]
        fn test_first_occurrence_wins() {
            let villages = vec![village("v1", 80, 18.5), village("v2", 78, 18.6)];
            let tankers = vec![tanker("t1", TankerStatus::Available), tanker("t2", TankerStatus::Available)];
            let candidate = CandidatePlan::new(
                "s".to_string(),
                vec![
                    proposed("t1", "v1", Some("urgent")),
                    proposed("t1", "v2", Some("urgent")),
                    proposed("t2", "v1", Some("urgent")),
                    proposed("t2", "v2", Some("urgent")),
                ],
            );

            let result = validate_plan(candidate, &villages, &tankers);
            let pairs: Vec<(&str, &str)> = result
                .plan
                .assignments
                .iter()
                .map(|a| (a.tanker_id.as_str(), a.village_id.as_str()))
                .collect();
            assert_eq!(pairs, vec![("t1", "v1"), ("t2", "v2")]);

            let reasons: Vec<(usize, DropReason)> = result.dropped.iter().map(|d| (d.index, d.reason)).collect();
            assert_eq!(
                reasons,
                vec![(1, DropReason::DuplicateTanker), (2, DropReason::DuplicateVillage)]
            );
        }

        #[test]
        fn test_rejects_unknown_served_and_unavailable() {
            let mut served = village("v2", 90, 18.6);
            served.has_active_dispatch = true;
            let villages = vec![village("v1", 80, 18.5), served];
            let tankers = vec![tanker("t1", TankerStatus::Available), tanker("t2", TankerStatus::Maintenance)];
            let candidate = CandidatePlan::new(
                "s".to_string(),
                vec![
                    proposed("ghost", "v1", None),
                    proposed("t1", "nowhere", None),
                    proposed("t1", "v2", None),
                    proposed("t2", "v1", None),
                ],
            );

            let result = validate_plan(candidate, &villages, &tankers);
            assert!(result.plan.assignments.is_empty());
            let reasons: Vec<DropReason> = result.dropped.iter().map(|d| d.reason).collect();
            assert_eq!(
                reasons,
                vec![
                    DropReason::UnknownTanker,
                    DropReason::UnknownVillage,
                    DropReason::VillageAlreadyServed,
                    DropReason::TankerUnavailable,
                ]
            );
        }

        #[test]
        fn test_rejected_entry_does_not_consume_tanker() {
            let mut served = village("v2", 90, 18.6);
            served.has_active_dispatch = true;
            let villages = vec![served, village("v1", 80, 18.5)];
            let tankers = vec![tanker("t1", TankerStatus::Available)];
            let candidate = CandidatePlan::new(
                "s".to_string(),
                vec![proposed("t1", "v2", None), proposed("t1", "v1", None)],
            );

            let result = validate_plan(candidate, &villages, &tankers);
            assert_eq!(result.plan.assignments.len(), 1);
            assert_eq!(result.plan.assignments[0].village_id, "v1");
        }

        #[test]
        fn test_malformed_entries_are_dropped_in_place() {
            let villages = vec![village("v1", 80, 18.5), village("v2", 65, 18.6)];
            let tankers = vec![tanker("t1", TankerStatus::Available), tanker("t2", TankerStatus::Available)];
            let text = r#"{"summary": "s", "assignments": [
                {"tankerId": "t1", "villageId": "v1", "priority": "low"},
                ["t9", "v9"],
                {"tankerId": "t2", "villageId": "v2", "priority": 2}
            ]}"#;

            let result = validate_plan(parse_candidate_plan(text).unwrap(), &villages, &tankers);

            assert_eq!(result.plan.assignments.len(), 2);
            assert_eq!(result.plan.assignments[0].priority, Priority::Low);
            // Numeric priority falls back to the stress tier
            assert_eq!(result.plan.assignments[1].priority, Priority::High);
            assert_eq!(result.dropped.len(), 1);
            assert_eq!(result.dropped[0].index, 1);
            assert_eq!(result.dropped[0].reason, DropReason::Malformed);
        }

        #[test]
        fn test_empty_plan_passes_summary_through() {
            let candidate = CandidatePlan::new("No assignments possible: fleet busy".to_string(), vec![]);
            let result = validate_plan(candidate, &[], &[]);
            assert_eq!(result.plan.summary, "No assignments possible: fleet busy");
            assert!(result.plan.assignments.is_empty());
        }
    }

    mod prompt {
        use super::*;

        #[test]
        fn test_prompt_lists_snapshots() {
            let mut critical = village("v1", 82, 18.5);
            critical.has_active_dispatch = true;
            let villages = vec![critical, village("v2", 60, 18.6)];
            let tankers = vec![tanker("t1", TankerStatus::Available)];
            let sources = vec![WaterSource {
                name: "Manjara".to_string(),
                kind: WaterSourceKind::Dam,
                coordinates: GpsCoordinates::new(18.7, 76.1),
                capacity_ml: 224.0,
                current_level_percent: 12.5,
                district: "Beed".to_string(),
            }];

            let prompt = build_optimizer_prompt(&villages, &tankers, &sources);
            assert!(prompt.system.contains("JSON only"));
            assert!(prompt.user.contains("- 2 villages with stress score >= 50"));
            assert!(prompt.user.contains("- 1 critical (stress > 75)"));
            assert!(prompt.user.contains("- 1 without an active dispatch"));
            assert!(prompt.user.contains("ID: t1"));
            assert!(prompt.user.contains("Driver: unassigned"));
            assert!(prompt.user.contains("Manjara dam (Beed)"));
        }

        #[test]
        fn test_prompt_without_water_sources() {
            let prompt = build_optimizer_prompt(&[], &[], &[]);
            assert!(prompt.user.contains("WATER SOURCES:\nNone available"));
        }
    }
}
