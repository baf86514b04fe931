//! Reporting service for dashboards and CSV export

use serde::{Deserialize, Serialize};
use shared::{
    dispatch_stats, district_stats, fleet_stats, overall_stats, DispatchRecord, DispatchStats, DistrictStats,
    FleetStats, OverallStats, Tanker, Village,
};

use crate::error::{AppError, AppResult};
use crate::services::{check_tankers, check_villages};

/// Dashboard overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewReport {
    pub villages: OverallStats,
    pub fleet: FleetStats,
    pub dispatches: DispatchStats,
    pub districts: Vec<DistrictStats>,
}

pub struct ReportingService;

impl ReportingService {
    pub fn new() -> Self {
        Self
    }

    pub fn district_report(&self, villages: &[Village]) -> AppResult<Vec<DistrictStats>> {
        check_villages(villages)?;
        let report = district_stats(villages);
        tracing::debug!(districts = report.len(), "Built district report");
        Ok(report)
    }

    pub fn fleet_report(&self, tankers: &[Tanker]) -> AppResult<FleetStats> {
        check_tankers(tankers)?;
        Ok(fleet_stats(tankers))
    }

    pub fn dispatch_report(&self, dispatches: &[DispatchRecord]) -> DispatchStats {
        let report = dispatch_stats(dispatches);
        tracing::debug!(
            dispatches = report.total,
            completion_rate = report.completion_rate,
            "Built dispatch report"
        );
        report
    }

    pub fn overview(
        &self,
        villages: &[Village],
        tankers: &[Tanker],
        dispatches: &[DispatchRecord],
    ) -> AppResult<OverviewReport> {
        check_villages(villages)?;
        check_tankers(tankers)?;
        Ok(OverviewReport {
            villages: overall_stats(villages),
            fleet: fleet_stats(tankers),
            dispatches: dispatch_stats(dispatches),
            districts: district_stats(villages),
        })
    }

    /// Export report rows to CSV with a header line
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }
}

impl Default for ReportingService {
    fn default() -> Self {
        Self::new()
    }
}
