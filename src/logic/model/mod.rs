//! Model Module - Outlier detection
//!
//! Isolation forest core plus the fitted-model wrapper the pipeline holds.

pub mod isolation;
pub mod detector;

// Re-export common types
pub use detector::{AnomalyModel, FitReport, Label};
pub use isolation::IsolationForest;
