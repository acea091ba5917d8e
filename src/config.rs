//! Configuration module
//!
//! Startup wiring only. Nothing here changes feature or model semantics.

use std::env;
use std::path::PathBuf;

/// Default baseline corpus location
pub const DEFAULT_BASELINE_PATH: &str = "non_suspicious_ipdr_10000.json";

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON array of known-normal records used to fit the model at startup
    pub baseline_path: PathBuf,

    /// Directory for staging uploaded PDFs (system temp dir when unset)
    pub pdf_staging_dir: Option<PathBuf>,

    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            baseline_path: env::var("IPDR_BASELINE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_BASELINE_PATH)),

            pdf_staging_dir: env::var("IPDR_PDF_STAGING_DIR")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),

            log_json: env::var("IPDR_LOG_JSON")
                .map(|s| parse_flag(&s))
                .unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            baseline_path: PathBuf::from(DEFAULT_BASELINE_PATH),
            pdf_staging_dir: None,
            log_json: false,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" 1 "));
        assert!(parse_flag("YES"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.baseline_path, PathBuf::from(DEFAULT_BASELINE_PATH));
        assert!(config.pdf_staging_dir.is_none());
        assert!(!config.log_json);
    }
}
