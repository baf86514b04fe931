//! Route definitions for the JalSarthi allocation server

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/stress", stress_routes())
        .nest("/dispatches", dispatch_routes())
        .route("/forecast", post(handlers::forecast_villages))
        .nest("/reports", report_routes())
}

/// Stress scoring routes
fn stress_routes() -> Router<AppState> {
    Router::new()
        .route("/assess", post(handlers::assess_stress))
        .route("/refresh", post(handlers::refresh_scores))
}

/// Tanker allocation routes
fn dispatch_routes() -> Router<AppState> {
    Router::new()
        .route("/recommend", post(handlers::recommend_tankers))
        .route("/auto-assign", post(handlers::auto_assign))
        .route("/validate-plan", post(handlers::validate_plan))
        .route("/ai-optimize", post(handlers::ai_optimize))
}

/// Reporting routes
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/districts", post(handlers::district_report))
        .route("/fleet", post(handlers::fleet_report))
        .route("/dispatches", post(handlers::dispatch_report))
        .route("/overview", post(handlers::overview))
}
