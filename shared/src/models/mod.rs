//! Domain models for the drought-relief allocation engine

mod dispatch;
mod forecast;
mod rainfall;
mod tanker;
mod village;

pub use dispatch::*;
pub use forecast::*;
pub use rainfall::*;
pub use tanker::*;
pub use village::*;
