//! Anomaly Model - fitted outlier detector over the feature layout
//!
//! Fit once, then score any number of batches through `&self`. The fitted
//! state is plain owned data, so a shared `Arc<AnomalyModel>` can be scored
//! from many threads without locking.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::isolation::{quantile, IsolationForest};
use crate::constants::{CONTAMINATION, MAX_SAMPLES, N_ESTIMATORS, RANDOM_SEED};
use crate::error::{SentinelError, SentinelResult};
use crate::logic::features::{layout_hash, FeatureMatrix, FEATURE_VERSION};

// ============================================================================
// LABEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Normal,
    Suspicious,
}

impl Label {
    pub fn is_suspicious(&self) -> bool {
        matches!(self, Label::Suspicious)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Normal => f.write_str("normal"),
            Label::Suspicious => f.write_str("suspicious"),
        }
    }
}

// ============================================================================
// FITTED STATE
// ============================================================================

#[derive(Debug, Clone)]
struct FittedState {
    forest: IsolationForest,
    /// Scores strictly above this are outliers
    threshold: f64,
    training_rows: usize,
}

/// Summary of a completed fit, for logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitReport {
    pub training_rows: usize,
    pub n_estimators: usize,
    pub subsample_size: usize,
    pub contamination: f64,
    pub threshold: f64,
    pub feature_version: u8,
    pub layout_hash: u32,
}

// ============================================================================
// MODEL
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct AnomalyModel {
    state: Option<FittedState>,
}

impl AnomalyModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit against a baseline feature matrix, replacing any prior fit
    pub fn fit(&mut self, features: &FeatureMatrix) -> SentinelResult<FitReport> {
        if features.is_empty() {
            return Err(SentinelError::validation("cannot fit on an empty baseline"));
        }
        if !features.is_finite() {
            return Err(SentinelError::validation("baseline features contain non-finite values"));
        }

        let started = Instant::now();
        let x = features.as_array();
        let forest = IsolationForest::fit(x, N_ESTIMATORS, MAX_SAMPLES, RANDOM_SEED);
        let scores = forest.score_samples(x);
        let threshold = quantile(&scores, 1.0 - CONTAMINATION);

        let report = FitReport {
            training_rows: features.nrows(),
            n_estimators: forest.n_estimators(),
            subsample_size: forest.subsample_size(),
            contamination: CONTAMINATION,
            threshold,
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
        };

        self.state = Some(FittedState {
            forest,
            threshold,
            training_rows: features.nrows(),
        });

        tracing::info!(
            rows = report.training_rows,
            trees = report.n_estimators,
            threshold = report.threshold,
            layout_hash = report.layout_hash,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Anomaly model fitted"
        );
        Ok(report)
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    /// Decision threshold chosen at fit time
    pub fn threshold(&self) -> SentinelResult<f64> {
        self.fitted().map(|s| s.threshold)
    }

    pub fn training_rows(&self) -> SentinelResult<usize> {
        self.fitted().map(|s| s.training_rows)
    }

    /// Per-row isolation score in (0, 1], higher is more anomalous
    pub fn anomaly_scores(&self, features: &FeatureMatrix) -> SentinelResult<Vec<f64>> {
        let state = self.fitted()?;
        if !features.is_finite() {
            tracing::warn!(rows = features.nrows(), "Rejected batch with non-finite features");
            return Err(SentinelError::validation("features contain non-finite values"));
        }
        Ok(state.forest.score_samples(features.as_array()))
    }

    /// One label per input row, same order
    pub fn score(&self, features: &FeatureMatrix) -> SentinelResult<Vec<Label>> {
        let threshold = self.threshold()?;
        let labels = self
            .anomaly_scores(features)?
            .into_iter()
            .map(|s| if s > threshold { Label::Suspicious } else { Label::Normal })
            .collect();
        Ok(labels)
    }

    fn fitted(&self) -> SentinelResult<&FittedState> {
        self.state.as_ref().ok_or(SentinelError::NotFitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::FeatureVector;

    fn grid(n: usize) -> FeatureMatrix {
        let vectors: Vec<FeatureVector> = (0..n)
            .map(|i| {
                FeatureVector::from([
                    600.0 + (i % 37) as f64 * 10.0,
                    1000.0 + (i % 23) as f64 * 20.0,
                    2000.0 + (i % 19) as f64 * 15.0,
                    (i % 24) as f64,
                    (i % 4 + 1) as f64,
                ])
            })
            .collect();
        FeatureMatrix::from_vectors(&vectors)
    }

    #[test]
    fn test_score_before_fit_fails() {
        let model = AnomalyModel::new();
        assert!(!model.is_fitted());
        assert!(model.score(&grid(3)).unwrap_err().is_not_fitted());
        assert!(model.threshold().unwrap_err().is_not_fitted());
    }

    #[test]
    fn test_fit_empty_fails() {
        let mut model = AnomalyModel::new();
        assert!(model.fit(&FeatureMatrix::empty()).unwrap_err().is_validation());
        assert!(!model.is_fitted());
    }

    #[test]
    fn test_fit_non_finite_fails() {
        let mut model = AnomalyModel::new();
        let bad = FeatureMatrix::from_vectors(&[FeatureVector::from([f64::NAN, 1.0, 1.0, 1.0, 1.0])]);
        assert!(model.fit(&bad).unwrap_err().is_validation());
    }

    #[test]
    fn test_labels_match_input_length() {
        let mut model = AnomalyModel::new();
        model.fit(&grid(500)).unwrap();

        for n in [0, 1, 7, 500] {
            assert_eq!(model.score(&grid(n)).unwrap().len(), n);
        }
    }

    #[test]
    fn test_far_outlier_is_suspicious() {
        let mut model = AnomalyModel::new();
        model.fit(&grid(1000)).unwrap();

        let outlier = FeatureMatrix::from_vectors(&[FeatureVector::from([
            86_400.0, 5_000_000.0, 9_000_000.0, 3.0, 0.0,
        ])]);
        assert_eq!(model.score(&outlier).unwrap(), vec![Label::Suspicious]);
    }

    #[test]
    fn test_refit_replaces_state() {
        let mut model = AnomalyModel::new();
        let first = model.fit(&grid(300)).unwrap();
        let second = model.fit(&grid(900)).unwrap();

        assert_eq!(first.training_rows, 300);
        assert_eq!(model.training_rows().unwrap(), 900);
        assert_eq!(model.threshold().unwrap(), second.threshold);
    }

    #[test]
    fn test_contamination_fraction_on_training_data() {
        let mut model = AnomalyModel::new();
        let x = grid(2000);
        model.fit(&x).unwrap();

        let suspicious = model.score(&x).unwrap().iter().filter(|l| l.is_suspicious()).count();
        let fraction = suspicious as f64 / 2000.0;
        assert!(fraction > 0.02 && fraction <= 0.06, "fraction {}", fraction);
    }

    #[test]
    fn test_fit_report_records_layout() {
        let report = AnomalyModel::new().fit(&grid(64)).unwrap();
        assert_eq!(report.feature_version, FEATURE_VERSION);
        assert_eq!(report.layout_hash, layout_hash());
        assert_eq!(report.subsample_size, 64);
    }

    #[test]
    fn test_non_finite_batch_rejected_at_scoring() {
        let mut model = AnomalyModel::new();
        model.fit(&grid(200)).unwrap();

        let batch = FeatureMatrix::from_vectors(&[FeatureVector::from([f64::INFINITY, 1.0, 1.0, 1.0, 1.0])]);
        assert!(model.anomaly_scores(&batch).unwrap_err().is_validation());
    }

    #[test]
    fn test_label_display() {
        assert_eq!(Label::Normal.to_string(), "normal");
        assert_eq!(Label::Suspicious.to_string(), "suspicious");
        assert_eq!(serde_json::to_string(&Label::Suspicious).unwrap(), "\"suspicious\"");
    }
}
