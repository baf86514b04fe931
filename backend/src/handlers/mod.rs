//! HTTP handlers

pub mod allocation;
pub mod forecast;
pub mod health;
pub mod reporting;
pub mod stress;

pub use allocation::{ai_optimize, auto_assign, recommend_tankers, validate_plan};
pub use forecast::forecast_villages;
pub use health::health_check;
pub use reporting::{dispatch_report, district_report, fleet_report, overview};
pub use stress::{assess_stress, refresh_scores};
