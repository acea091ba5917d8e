//! Features Module - Feature Extraction Engine
//!
//! Turns canonical record tables into the fixed five-column matrix the
//! anomaly model is fitted and scored on.

pub mod layout;
pub mod access;
pub mod timestamp;
pub mod vector;
pub mod extract;

#[cfg(test)]
mod tests;

// Re-export common types
pub use access::encode_access_type;
pub use extract::extract_features;
pub use layout::{layout_hash, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use vector::{FeatureMatrix, FeatureVector, FeatureVectorBuilder};
