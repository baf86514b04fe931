//! Allocation and forecasting engine for JalSarthi drought relief
//!
//! Everything here is a pure function over in-memory snapshots: stress
//! scoring, tanker ranking, greedy dispatch planning, rainfall trend
//! forecasting and validation of externally generated plans. The backend
//! and the WASM bindings both build on this crate.

pub mod allocation;
pub mod forecast;
pub mod models;
pub mod plan;
pub mod stats;
pub mod stress;
pub mod types;
pub mod validation;

pub use allocation::*;
pub use forecast::*;
pub use models::*;
pub use plan::*;
pub use stats::*;
pub use stress::*;
pub use types::*;
pub use validation::*;
