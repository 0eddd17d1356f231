//! Shared types and feature engineering for LOGIS:COPE
//!
//! This crate holds everything that does not need a server: observation
//! models, the static Busan region table, rainfall buckets, the feature
//! transform and the scoring pipeline. The backend and the WASM bindings
//! both build on it.

pub mod error;
pub mod features;
pub mod models;
pub mod pipeline;
pub mod types;
pub mod validation;

pub use error::*;
pub use features::*;
pub use models::*;
pub use pipeline::*;
pub use types::*;
pub use validation::*;
