//! Prediction response shapes

use serde::{Deserialize, Serialize};

use crate::logic::pipeline::ScoredRecord;

/// `/predict`-style body: `true` means the row is NOT suspicious
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predictions: Vec<bool>,
}

impl PredictionResponse {
    pub fn from_scored(scored: &[ScoredRecord]) -> Self {
        Self {
            predictions: scored.iter().map(|r| !r.label.is_suspicious()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub suspicious: usize,
    pub normal: usize,
}

impl BatchSummary {
    pub fn from_scored(scored: &[ScoredRecord]) -> Self {
        let suspicious = scored.iter().filter(|r| r.label.is_suspicious()).count();
        Self {
            total: scored.len(),
            suspicious,
            normal: scored.len() - suspicious,
        }
    }

    pub fn suspicious_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.suspicious as f64 / self.total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::Label;
    use crate::logic::pipeline::RecordIdentity;

    fn scored(labels: &[Label]) -> Vec<ScoredRecord> {
        labels
            .iter()
            .enumerate()
            .map(|(row, &label)| ScoredRecord {
                identity: RecordIdentity {
                    row,
                    id: None,
                    phone_number: None,
                    imei: None,
                    imsi: None,
                },
                label,
            })
            .collect()
    }

    #[test]
    fn test_predictions_invert_suspicion() {
        let batch = scored(&[Label::Normal, Label::Suspicious, Label::Normal]);
        let response = PredictionResponse::from_scored(&batch);

        assert_eq!(response.predictions, vec![true, false, true]);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({"predictions": [true, false, true]})
        );
    }

    #[test]
    fn test_summary_counts() {
        let summary = BatchSummary::from_scored(&scored(&[Label::Suspicious, Label::Normal]));
        assert_eq!(summary.total, 2);
        assert_eq!(summary.suspicious, 1);
        assert_eq!(summary.normal, 1);
        assert_eq!(summary.suspicious_ratio(), 0.5);
        assert_eq!(BatchSummary::from_scored(&[]).suspicious_ratio(), 0.0);
    }
}
