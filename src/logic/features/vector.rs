//! Feature Vector / Feature Matrix - Core data structures for model input
//!
//! A matrix can only be assembled from fixed-size vectors, so its width
//! always equals `FEATURE_COUNT`.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::layout::{
    layout_hash, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, IDX_ACCESS_TYPE, IDX_DOWNLINK,
    IDX_DURATION, IDX_HOUR, IDX_UPLINK,
};

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// One record's features in layout order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn new() -> Self {
        Self { values: [0.0; FEATURE_COUNT] }
    }

    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn duration(&self) -> f64 {
        self.values[IDX_DURATION]
    }

    pub fn hour_of_day(&self) -> f64 {
        self.values[IDX_HOUR]
    }

    pub fn access_type_encoded(&self) -> f64 {
        self.values[IDX_ACCESS_TYPE]
    }

    /// JSON form for debug logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": FEATURE_VERSION,
            "layout_hash": layout_hash(),
            "named_values": FEATURE_LAYOUT.iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), *value))
                .collect::<std::collections::HashMap<_, _>>(),
        })
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::new()
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self::from_values(values)
    }
}

// ============================================================================
// BUILDER PATTERN
// ============================================================================

/// Builder for creating FeatureVector with named setters
pub struct FeatureVectorBuilder {
    vector: FeatureVector,
}

impl FeatureVectorBuilder {
    pub fn new() -> Self {
        Self { vector: FeatureVector::new() }
    }

    pub fn duration(mut self, seconds: f64) -> Self {
        self.vector.values[IDX_DURATION] = seconds;
        self
    }

    pub fn uplink_volume(mut self, bytes: f64) -> Self {
        self.vector.values[IDX_UPLINK] = bytes;
        self
    }

    pub fn downlink_volume(mut self, bytes: f64) -> Self {
        self.vector.values[IDX_DOWNLINK] = bytes;
        self
    }

    pub fn hour_of_day(mut self, hour: u32) -> Self {
        self.vector.values[IDX_HOUR] = hour as f64;
        self
    }

    pub fn access_type_encoded(mut self, code: i32) -> Self {
        self.vector.values[IDX_ACCESS_TYPE] = code as f64;
        self
    }

    pub fn build(self) -> FeatureVector {
        self.vector
    }
}

impl Default for FeatureVectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// FEATURE MATRIX
// ============================================================================

/// Rows of feature vectors, `n x FEATURE_COUNT`
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    data: Array2<f64>,
}

impl FeatureMatrix {
    pub fn empty() -> Self {
        Self { data: Array2::zeros((0, FEATURE_COUNT)) }
    }

    /// One row per vector, same order
    pub fn from_vectors(vectors: &[FeatureVector]) -> Self {
        let data = Array2::from_shape_fn((vectors.len(), FEATURE_COUNT), |(row, col)| {
            vectors[row].values[col]
        });
        Self { data }
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn vector(&self, index: usize) -> Option<FeatureVector> {
        if index >= self.nrows() {
            return None;
        }
        let mut values = [0.0; FEATURE_COUNT];
        for (slot, v) in values.iter_mut().zip(self.data.row(index).iter()) {
            *slot = *v;
        }
        Some(FeatureVector::from_values(values))
    }

    /// Every value finite (no NaN/inf)
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_places_values_in_layout_order() {
        let vector = FeatureVectorBuilder::new()
            .duration(300.0)
            .uplink_volume(1200.0)
            .downlink_volume(3400.0)
            .hour_of_day(14)
            .access_type_encoded(3)
            .build();

        assert_eq!(vector.values, [300.0, 1200.0, 3400.0, 14.0, 3.0]);
        assert_eq!(vector.hour_of_day(), 14.0);
    }

    #[test]
    fn test_matrix_from_vectors() {
        let a = FeatureVector::from([1.0, 2.0, 3.0, 4.0, 5.0]);
        let b = FeatureVector::from([6.0, 7.0, 8.0, 9.0, 10.0]);
        let m = FeatureMatrix::from_vectors(&[a, b]);

        assert_eq!(m.nrows(), 2);
        assert_eq!(m.vector(1), Some(b));
        assert_eq!(m.vector(2), None);
        assert!(m.is_finite());
    }

    #[test]
    fn test_matrix_keeps_every_row_at_layout_width() {
        let vectors: Vec<FeatureVector> = (0..257)
            .map(|i| FeatureVector::from([i as f64, 1.0, 2.0, 3.0, 4.0]))
            .collect();
        let m = FeatureMatrix::from_vectors(&vectors);

        assert_eq!(m.as_array().dim(), (257, FEATURE_COUNT));
        assert_eq!(m.vector(256).unwrap().duration(), 256.0);
        assert_eq!(FeatureMatrix::from_vectors(&[]).as_array().dim(), (0, FEATURE_COUNT));
    }

    #[test]
    fn test_to_log_entry() {
        let log = FeatureVector::from([90.0, 1.0, 2.0, 23.0, 4.0]).to_log_entry();
        assert_eq!(log["feature_version"], FEATURE_VERSION);
        assert_eq!(log["layout_hash"], layout_hash());
        assert_eq!(log["named_values"]["hourOfDay"], 23.0);
    }
}
