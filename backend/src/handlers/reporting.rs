//! Reporting handlers for analytics and data export

use axum::{extract::Query, http::header, response::IntoResponse, Json};
use serde::Deserialize;
use shared::{DispatchRecord, DispatchStats, Tanker, Village};

use crate::error::AppResult;
use crate::services::reporting::{OverviewReport, ReportingService};

#[derive(Deserialize)]
pub struct ReportQuery {
    pub format: Option<String>, // "json" or "csv"
}

#[derive(Deserialize)]
pub struct VillageReportRequest {
    pub villages: Vec<Village>,
}

#[derive(Deserialize)]
pub struct FleetReportRequest {
    pub tankers: Vec<Tanker>,
}

#[derive(Deserialize)]
pub struct DispatchReportRequest {
    pub dispatches: Vec<DispatchRecord>,
}

#[derive(Deserialize)]
pub struct OverviewRequest {
    #[serde(default)]
    pub villages: Vec<Village>,
    #[serde(default)]
    pub tankers: Vec<Tanker>,
    #[serde(default)]
    pub dispatches: Vec<DispatchRecord>,
}

fn wants_csv(query: &ReportQuery) -> bool {
    query.format.as_deref() == Some("csv")
}

/// Per-district stress report
pub async fn district_report(
    Query(query): Query<ReportQuery>,
    Json(request): Json<VillageReportRequest>,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new();
    let data = service.district_report(&request.villages)?;

    if wants_csv(&query) {
        let csv = ReportingService::export_to_csv(&data)?;
        Ok((
            [(header::CONTENT_TYPE, "text/csv"), (header::CONTENT_DISPOSITION, "attachment; filename=\"district_stress.csv\"")],
            csv,
        ).into_response())
    } else {
        Ok(Json(data).into_response())
    }
}

/// Fleet utilization report
pub async fn fleet_report(
    Query(query): Query<ReportQuery>,
    Json(request): Json<FleetReportRequest>,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new();
    let data = service.fleet_report(&request.tankers)?;

    if wants_csv(&query) {
        let csv = ReportingService::export_to_csv(std::slice::from_ref(&data))?;
        Ok((
            [(header::CONTENT_TYPE, "text/csv"), (header::CONTENT_DISPOSITION, "attachment; filename=\"fleet.csv\"")],
            csv,
        ).into_response())
    } else {
        Ok(Json(data).into_response())
    }
}

/// Dispatch completion and breakdown report
pub async fn dispatch_report(Json(request): Json<DispatchReportRequest>) -> Json<DispatchStats> {
    Json(ReportingService::new().dispatch_report(&request.dispatches))
}

/// Dashboard overview
pub async fn overview(Json(request): Json<OverviewRequest>) -> AppResult<Json<OverviewReport>> {
    let report = ReportingService::new().overview(&request.villages, &request.tankers, &request.dispatches)?;
    Ok(Json(report))
}
