//! Business logic services for the LOGIS:COPE server

pub mod prediction;

pub use prediction::{Prediction, PredictionService};
