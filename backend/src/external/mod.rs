//! External API integrations

pub mod optimizer;

pub use optimizer::OptimizerClient;
