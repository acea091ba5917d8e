//! Pipeline - train once, score many
//!
//! `train` builds the fitted model from a baseline corpus at startup.
//! `ScoringService` holds it behind an `Arc` and scores raw sources; every
//! call either returns one label per input row, in order, or fails whole.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{SentinelError, SentinelResult};
use crate::logic::features::extract_features;
use crate::logic::ingest::{
    self, IpdrRecord, PdfTextExtractor, RawSource, SourceKind, Table, TableExtractor,
};
use crate::logic::model::{AnomalyModel, Label};

// ============================================================================
// RESULTS
// ============================================================================

/// What ties a label back to the submitted row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordIdentity {
    /// Zero-based position in the submitted batch
    pub row: usize,
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imei: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imsi: Option<String>,
}

impl RecordIdentity {
    fn from_row(table: &Table, row: usize) -> Self {
        let text = |column: &str| {
            table
                .get(row, column)
                .and_then(|cell| cell.as_text())
                .map(|s| s.into_owned())
        };
        Self {
            row,
            id: text("_id"),
            phone_number: text("phoneNumber"),
            imei: text("imei"),
            imsi: text("imsi"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub identity: RecordIdentity,
    pub label: Label,
}

// ============================================================================
// TRAINING
// ============================================================================

/// Fit a fresh model on a baseline table
pub fn train(baseline: &Table) -> SentinelResult<AnomalyModel> {
    let features = extract_features(baseline)?;
    let mut model = AnomalyModel::new();
    model.fit(&features)?;
    Ok(model)
}

pub fn train_records(records: &[IpdrRecord]) -> SentinelResult<AnomalyModel> {
    train(&ingest::records_to_table(records)?)
}

pub fn train_from_path(path: &Path) -> SentinelResult<AnomalyModel> {
    train(&ingest::load_baseline_corpus(path)?)
}

// ============================================================================
// SCORING
// ============================================================================

/// Score a raw source against a fitted model
pub fn score_batch(
    model: &AnomalyModel,
    source: &RawSource,
    extractor: &dyn TableExtractor,
) -> SentinelResult<Vec<ScoredRecord>> {
    if !model.is_fitted() {
        return Err(SentinelError::NotFitted);
    }
    let table = ingest::normalize(source, extractor)?;
    let scored = score_table(model, &table)?;

    tracing::info!(
        kind = %source.kind(),
        rows = scored.len(),
        suspicious = scored.iter().filter(|r| r.label.is_suspicious()).count(),
        "Batch scored"
    );
    Ok(scored)
}

/// Score an already-normalized table
pub fn score_table(model: &AnomalyModel, table: &Table) -> SentinelResult<Vec<ScoredRecord>> {
    if !model.is_fitted() {
        return Err(SentinelError::NotFitted);
    }
    if table.is_empty() {
        return Ok(Vec::new());
    }

    let features = extract_features(table)?;
    let labels = model.score(&features)?;
    if labels.len() != table.len() {
        return Err(SentinelError::validation(format!(
            "label count {} does not match row count {}",
            labels.len(),
            table.len()
        )));
    }

    for (row, label) in labels.iter().enumerate() {
        if !label.is_suspicious() {
            continue;
        }
        if let Some(vector) = features.vector(row) {
            tracing::debug!(row, features = %vector.to_log_entry(), "Flagged record");
        }
    }

    Ok(labels
        .into_iter()
        .enumerate()
        .map(|(row, label)| ScoredRecord {
            identity: RecordIdentity::from_row(table, row),
            label,
        })
        .collect())
}

// ============================================================================
// SERVICE
// ============================================================================

/// Serving-side holder of the fitted model. Cheap to clone; clones share
/// the same immutable model.
#[derive(Clone)]
pub struct ScoringService {
    model: Arc<AnomalyModel>,
    extractor: Arc<dyn TableExtractor>,
}

impl ScoringService {
    pub fn new(model: AnomalyModel) -> Self {
        Self {
            model: Arc::new(model),
            extractor: Arc::new(PdfTextExtractor::new()),
        }
    }

    /// Load the baseline corpus named in `config` and fit synchronously
    pub fn start(config: &Config) -> SentinelResult<Self> {
        tracing::info!(baseline = %config.baseline_path.display(), "Training anomaly model");
        let model = train_from_path(&config.baseline_path)?;

        let extractor = match &config.pdf_staging_dir {
            Some(dir) => PdfTextExtractor::with_staging_dir(dir),
            None => PdfTextExtractor::new(),
        };

        tracing::info!("Model trained and ready");
        Ok(Self::new(model).with_extractor(extractor))
    }

    pub fn with_extractor(mut self, extractor: impl TableExtractor + 'static) -> Self {
        let extractor: Arc<dyn TableExtractor> = Arc::new(extractor);
        self.extractor = extractor;
        self
    }

    pub fn model(&self) -> &AnomalyModel {
        &self.model
    }

    pub fn score_batch(&self, source: &RawSource) -> SentinelResult<Vec<ScoredRecord>> {
        score_batch(&self.model, source, self.extractor.as_ref())
    }

    pub fn score_bytes(&self, bytes: &[u8], kind: SourceKind) -> SentinelResult<Vec<ScoredRecord>> {
        self.score_batch(&RawSource::new(kind, bytes))
    }
}
