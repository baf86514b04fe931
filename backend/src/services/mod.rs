//! Business logic services for the JalSarthi allocation server
//!
//! Services are stateless wrappers over the `shared` engine: they check the
//! request snapshots, call the engine and log the decisions it made.

pub mod allocation;
pub mod forecast;
pub mod optimizer;
pub mod reporting;
pub mod stress;

pub use allocation::AllocationService;
pub use forecast::ForecastService;
pub use optimizer::OptimizerService;
pub use reporting::ReportingService;
pub use stress::StressService;

use shared::{validate_rainfall_records, validate_tanker, validate_village, RainfallRecord, Tanker, Village};

use crate::error::{AppError, AppResult};

/// Reject the request on the first invalid village
pub(crate) fn check_villages(villages: &[Village]) -> AppResult<()> {
    for (i, village) in villages.iter().enumerate() {
        validate_village(village).map_err(|msg| AppError::invalid(format!("villages[{}]", i), msg))?;
    }
    Ok(())
}

/// Reject the request on the first invalid tanker
pub(crate) fn check_tankers(tankers: &[Tanker]) -> AppResult<()> {
    for (i, tanker) in tankers.iter().enumerate() {
        validate_tanker(tanker).map_err(|msg| AppError::invalid(format!("tankers[{}]", i), msg))?;
    }
    Ok(())
}

pub(crate) fn check_records(records: &[RainfallRecord]) -> AppResult<()> {
    validate_rainfall_records(records).map_err(|msg| AppError::invalid("records", msg))
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_check_villages_reports_index() {
        let mut bad = village("v2", 80, 18.9);
        bad.stress_score = 140;
        let err = check_villages(&[village("v1", 80, 18.9), bad]).unwrap_err();
        match err {
            AppError::Validation { field, .. } => assert_eq!(field, "villages[1]"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_check_tankers() {
        assert!(check_tankers(&[tanker("t1", 18.9)]).is_ok());

        let mut empty_tank = tanker("t2", 18.9);
        empty_tank.capacity_liters = 0;
        assert!(check_tankers(&[empty_tank]).is_err());
    }
}
