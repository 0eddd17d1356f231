//! HTTP handlers

mod features;
mod health;
mod prediction;

pub use features::*;
pub use health::*;
pub use prediction::*;
