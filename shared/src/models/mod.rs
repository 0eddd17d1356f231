//! Domain models for the call-count prediction service

mod observation;
mod rainfall;
mod region;

pub use observation::*;
pub use rainfall::*;
pub use region::*;
