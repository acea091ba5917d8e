//! Central Configuration Constants
//!
//! Model hyperparameters are compiled in. They are training-time
//! configuration and are never exposed as per-request tunables.

/// Number of isolation trees
pub const N_ESTIMATORS: usize = 100;

/// Expected fraction of outliers in the baseline corpus
pub const CONTAMINATION: f64 = 0.05;

/// Seed for tree construction and subsampling
pub const RANDOM_SEED: u64 = 42;

/// Subsample size per tree (capped at the corpus size)
pub const MAX_SAMPLES: usize = 256;

/// Columns every source must carry before feature extraction
pub const REQUIRED_COLUMNS: &[&str] = &[
    "startTime",
    "endTime",
    "uplinkVolume",
    "downlinkVolume",
    "accessType",
];

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "IPDR Sentinel";
