//! Dispatch planning models

use serde::{Deserialize, Serialize};

/// Dispatch priority tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Tier derived from a village's stress score
    pub fn from_stress(stress_score: u32) -> Self {
        if stress_score > 75 {
            Priority::Urgent
        } else if stress_score > 60 {
            Priority::High
        } else {
            Priority::Medium
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = ();

    /// Only the four exact lowercase tokens are recognized
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => Err(()),
        }
    }
}

/// Lifecycle state of a persisted dispatch
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    Pending,
    Assigned,
    #[serde(alias = "in-transit")]
    InTransit,
    Delivering,
    Completed,
    Cancelled,
}

impl DispatchStatus {
    /// Completed or cancelled
    pub fn is_finished(&self) -> bool {
        matches!(self, DispatchStatus::Completed | DispatchStatus::Cancelled)
    }
}

impl std::fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchStatus::Pending => write!(f, "pending"),
            DispatchStatus::Assigned => write!(f, "assigned"),
            DispatchStatus::InTransit => write!(f, "in_transit"),
            DispatchStatus::Delivering => write!(f, "delivering"),
            DispatchStatus::Completed => write!(f, "completed"),
            DispatchStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Snapshot of a dispatch as stored by the persistence layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispatchRecord {
    pub id: String,
    pub tanker_id: String,
    pub village_id: String,
    pub status: DispatchStatus,
    pub priority: Priority,
    pub trips_assigned: u32,
}

/// A tanker scored against a target location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TankerRecommendation {
    pub tanker_id: String,
    pub registration_no: String,
    /// Rounded to 0.1 km
    pub distance_km: f64,
    pub estimated_minutes: u32,
    pub proximity_score: f64,
    pub capacity_score: f64,
    pub status_score: f64,
    /// 0-100
    pub score: u32,
}

/// One tanker sent to one village
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    pub tanker_id: String,
    pub tanker_registration: String,
    pub village_id: String,
    pub village_name: String,
    /// Always at least 1
    pub trips_assigned: u32,
    pub priority: Priority,
    /// Recommendation score, set by the auto-assign planner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    /// Free-text rationale, set when the plan came from the external generator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// Depot to village, rounded to 0.1 km
    pub estimated_distance_km: f64,
}

/// Outcome of a greedy auto-assign run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AutoAssignResult {
    pub created: Vec<Assignment>,
    /// Names of villages no tanker could be found for
    pub skipped: Vec<String>,
}

impl AutoAssignResult {
    pub fn summary(&self) -> String {
        format!(
            "Created {} dispatches, skipped {} villages",
            self.created.len(),
            self.skipped.len()
        )
    }
}

/// Dispatch plan as proposed by the external generator.
///
/// Only the fields the validator reads are kept; anything else in the
/// payload, including a claimed distance, is discarded while parsing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidatePlan {
    pub summary: String,
    pub assignments: Vec<ProposedAssignment>,
    /// Positions in the generator's array of entries that could not be read
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub malformed: Vec<usize>,
}

impl CandidatePlan {
    pub fn new(summary: impl Into<String>, assignments: Vec<ProposedAssignment>) -> Self {
        Self {
            summary: summary.into(),
            assignments,
            malformed: Vec::new(),
        }
    }
}

/// Untrusted assignment proposal
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProposedAssignment {
    #[serde(default)]
    pub tanker_id: String,
    #[serde(default)]
    pub tanker_reg: String,
    #[serde(default)]
    pub village_id: String,
    #[serde(default)]
    pub village_name: String,
    /// Raw priority token, coerced during validation
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// A plan that passed validation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispatchPlan {
    pub summary: String,
    pub assignments: Vec<Assignment>,
}

/// Why a proposed assignment was dropped
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Not an object, or missing a string tanker or village id
    Malformed,
    UnknownTanker,
    UnknownVillage,
    VillageAlreadyServed,
    TankerUnavailable,
    DuplicateTanker,
    DuplicateVillage,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::Malformed => write!(f, "entry is not a readable assignment"),
            DropReason::UnknownTanker => write!(f, "unknown tanker"),
            DropReason::UnknownVillage => write!(f, "unknown village"),
            DropReason::VillageAlreadyServed => write!(f, "village already has an active dispatch"),
            DropReason::TankerUnavailable => write!(f, "tanker is not available"),
            DropReason::DuplicateTanker => write!(f, "tanker already assigned in this plan"),
            DropReason::DuplicateVillage => write!(f, "village already assigned in this plan"),
        }
    }
}

/// A proposal the validator rejected, kept for logging
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DroppedAssignment {
    /// Position in the candidate plan
    pub index: usize,
    pub tanker_id: String,
    pub village_id: String,
    pub reason: DropReason,
}
