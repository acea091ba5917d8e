//! Error handling
//!
//! Every failure in the pipeline is a whole-batch failure. Callers get one
//! typed error and no partial results.

use thiserror::Error;

pub type SentinelResult<T> = Result<T, SentinelError>;

#[derive(Debug, Error)]
pub enum SentinelError {
    // Parse errors
    #[error("Parse error: {0}")]
    Parse(String),

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing columns in data: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    // Lifecycle errors
    #[error("Model not fitted")]
    NotFitted,

    // Source dispatch
    #[error("Unsupported file format: {0}. Use CSV, JSON, or PDF.")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SentinelError {
    pub fn parse(msg: impl Into<String>) -> Self {
        SentinelError::Parse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        SentinelError::Validation(msg.into())
    }

    /// Unparseable timestamp, malformed source, or empty table extraction
    pub fn is_parse(&self) -> bool {
        matches!(self, SentinelError::Parse(_))
    }

    /// Missing required column or non-numeric required field
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SentinelError::Validation(_) | SentinelError::MissingColumns(_)
        )
    }

    pub fn is_not_fitted(&self) -> bool {
        matches!(self, SentinelError::NotFitted)
    }
}

impl From<csv::Error> for SentinelError {
    fn from(err: csv::Error) -> Self {
        SentinelError::Parse(format!("delimited text: {}", err))
    }
}

impl From<serde_json::Error> for SentinelError {
    fn from(err: serde_json::Error) -> Self {
        SentinelError::Parse(format!("json: {}", err))
    }
}
