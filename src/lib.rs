//! IPDR Sentinel
//!
//! Flags IP Detail Records as normal or suspicious with an isolation
//! forest fitted on known-normal traffic.
//!
//! # Architecture
//!
//! ```text
//! raw source (CSV | JSON | PDF)
//!        │  logic::ingest::normalize
//!        ▼
//! canonical Table ──► logic::features::extract_features ──► FeatureMatrix
//!                                                              │
//!                                    logic::model::AnomalyModel::score
//!                                                              ▼
//!                                              [ScoredRecord] (row order kept)
//! ```

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod logic;

pub use error::{SentinelError, SentinelResult};
pub use logic::features::{extract_features, FeatureMatrix, FeatureVector};
pub use logic::ingest::{IpdrRecord, RawSource, SourceKind, Table};
pub use logic::model::{AnomalyModel, Label};
pub use logic::pipeline::{
    score_batch, train, train_from_path, train_records, RecordIdentity, ScoredRecord,
    ScoringService,
};
