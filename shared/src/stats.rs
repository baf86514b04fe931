//! Dashboard and report aggregates over village and fleet snapshots

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::{DispatchRecord, DispatchStatus, Priority, StressLevel, Tanker, TankerStatus, Village};
use crate::types::{round_half_up, round_to};

/// Stress summary for one district
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DistrictStats {
    pub district: String,
    pub total_villages: usize,
    pub critical_count: usize,
    pub warning_count: usize,
    pub safe_count: usize,
    pub avg_stress_score: u32,
    pub total_tanker_demand: u64,
    pub active_dispatches: usize,
}

/// Stress summary across every village
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OverallStats {
    pub total_villages: usize,
    pub critical_count: usize,
    pub warning_count: usize,
    pub safe_count: usize,
    pub avg_stress_score: u32,
    pub total_tanker_demand: u64,
}

/// Fleet status summary
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FleetStats {
    pub total: usize,
    pub available: usize,
    pub dispatched: usize,
    pub in_transit: usize,
    pub delivering: usize,
    pub maintenance: usize,
    pub offline: usize,
    /// Percent of operational tankers out on a run
    pub utilization_rate: u32,
    pub avg_capacity_liters: u32,
}

/// Dispatch lifecycle summary
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DispatchStats {
    pub total: usize,
    pub completed: usize,
    pub cancelled: usize,
    /// Neither completed nor cancelled
    pub active: usize,
    pub pending: usize,
    /// Percent of finished dispatches that completed
    pub completion_rate: u32,
    /// Rounded to 0.1
    pub avg_trips_assigned: f64,
    pub status_breakdown: BTreeMap<DispatchStatus, usize>,
    pub priority_breakdown: BTreeMap<Priority, usize>,
}

fn average_stress(villages: &[&Village]) -> u32 {
    if villages.is_empty() {
        return 0;
    }
    let total: u64 = villages.iter().map(|v| u64::from(v.stress_score)).sum();
    round_half_up(total as f64 / villages.len() as f64) as u32
}

fn total_demand(villages: &[&Village]) -> u64 {
    villages.iter().map(|v| u64::from(v.tanker_demand)).sum()
}

fn count_level(villages: &[&Village], level: StressLevel) -> usize {
    villages.iter().filter(|v| v.stress_level() == level).count()
}

pub fn overall_stats(villages: &[Village]) -> OverallStats {
    let refs: Vec<&Village> = villages.iter().collect();
    OverallStats {
        total_villages: refs.len(),
        critical_count: count_level(&refs, StressLevel::Critical),
        warning_count: count_level(&refs, StressLevel::Warning),
        safe_count: count_level(&refs, StressLevel::Safe),
        avg_stress_score: average_stress(&refs),
        total_tanker_demand: total_demand(&refs),
    }
}

/// Per-district summaries, most stressed district first.
///
/// Districts with equal averages keep the order in which they first appear.
pub fn district_stats(villages: &[Village]) -> Vec<DistrictStats> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&Village>> = HashMap::new();
    for village in villages {
        let district = village.district.as_str();
        groups
            .entry(district)
            .or_insert_with(|| {
                order.push(district);
                Vec::new()
            })
            .push(village);
    }

    let mut stats: Vec<DistrictStats> = order
        .into_iter()
        .filter_map(|district| groups.get(district).map(|members| (district, members)))
        .map(|(district, members)| DistrictStats {
            district: district.to_string(),
            total_villages: members.len(),
            critical_count: count_level(members, StressLevel::Critical),
            warning_count: count_level(members, StressLevel::Warning),
            safe_count: count_level(members, StressLevel::Safe),
            avg_stress_score: average_stress(members),
            total_tanker_demand: total_demand(members),
            active_dispatches: members.iter().filter(|v| v.has_active_dispatch).count(),
        })
        .collect();

    stats.sort_by(|a, b| b.avg_stress_score.cmp(&a.avg_stress_score));
    stats
}

pub fn fleet_stats(tankers: &[Tanker]) -> FleetStats {
    let count = |status: TankerStatus| tankers.iter().filter(|t| t.status == status).count();

    let active = tankers.iter().filter(|t| t.status.is_active()).count();
    let operational = tankers.iter().filter(|t| t.status.is_operational()).count();

    let utilization_rate = if operational > 0 {
        round_half_up(active as f64 / operational as f64 * 100.0) as u32
    } else {
        0
    };

    let avg_capacity_liters = if tankers.is_empty() {
        0
    } else {
        let total: u64 = tankers.iter().map(|t| u64::from(t.capacity_liters)).sum();
        round_half_up(total as f64 / tankers.len() as f64) as u32
    };

    FleetStats {
        total: tankers.len(),
        available: count(TankerStatus::Available),
        dispatched: count(TankerStatus::Dispatched),
        in_transit: count(TankerStatus::InTransit),
        delivering: count(TankerStatus::Delivering),
        maintenance: count(TankerStatus::Maintenance),
        offline: count(TankerStatus::Offline),
        utilization_rate,
        avg_capacity_liters,
    }
}

pub fn dispatch_stats(dispatches: &[DispatchRecord]) -> DispatchStats {
    let mut status_breakdown: BTreeMap<DispatchStatus, usize> = BTreeMap::new();
    let mut priority_breakdown: BTreeMap<Priority, usize> = BTreeMap::new();
    let mut total_trips: u64 = 0;

    for dispatch in dispatches {
        *status_breakdown.entry(dispatch.status).or_default() += 1;
        *priority_breakdown.entry(dispatch.priority).or_default() += 1;
        total_trips += u64::from(dispatch.trips_assigned);
    }

    let count = |status: DispatchStatus| status_breakdown.get(&status).copied().unwrap_or(0);
    let completed = count(DispatchStatus::Completed);
    let cancelled = count(DispatchStatus::Cancelled);
    let pending = count(DispatchStatus::Pending);
    let finished = completed + cancelled;

    let completion_rate = if finished > 0 {
        round_half_up(completed as f64 / finished as f64 * 100.0) as u32
    } else {
        0
    };
    let avg_trips_assigned = if dispatches.is_empty() {
        0.0
    } else {
        round_to(total_trips as f64 / dispatches.len() as f64, 1)
    };

    DispatchStats {
        total: dispatches.len(),
        completed,
        cancelled,
        active: dispatches.len() - finished,
        pending,
        completion_rate,
        avg_trips_assigned,
        status_breakdown,
        priority_breakdown,
    }
}
