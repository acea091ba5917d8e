//! Logic Module - Ingestion, features, model and the pipeline tying them
//!
//! - `ingest/` - Source normalization (CSV, JSON, PDF tables)
//! - `features/` - Feature extraction and layout
//! - `model/` - Isolation forest and fitted model
//! - `pipeline` - Train once, score many

pub mod ingest;
pub mod features;
pub mod model;
pub mod pipeline;
