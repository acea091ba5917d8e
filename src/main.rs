//! IPDR Sentinel runner
//!
//! Trains on the configured baseline corpus, then scores each file given
//! on the command line and prints the prediction body per file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ipdr_sentinel::api::{BatchSummary, PredictionResponse};
use ipdr_sentinel::config::Config;
use ipdr_sentinel::constants::{APP_NAME, APP_VERSION};
use ipdr_sentinel::{ScoringService, SourceKind};

#[derive(Debug, Parser)]
#[command(name = "ipdr-sentinel", version, about = "Score IPDR batches against a baseline")]
struct Args {
    /// Files to score (.csv, .json, .pdf)
    files: Vec<PathBuf>,

    /// Baseline corpus, overrides IPDR_BASELINE_PATH
    #[arg(long)]
    baseline: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ipdr_sentinel=info".into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(path) = args.baseline {
        config.baseline_path = path;
    }
    init_tracing(config.log_json || args.json_logs);

    tracing::info!("{} v{} starting...", APP_NAME, APP_VERSION);

    let service = ScoringService::start(&config).with_context(|| {
        format!("training from baseline {}", config.baseline_path.display())
    })?;

    for path in &args.files {
        let name = path.to_string_lossy();
        let kind = SourceKind::from_file_name(&name)?;
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", name))?;

        let scored = service
            .score_bytes(&bytes, kind)
            .with_context(|| format!("scoring {}", name))?;

        let summary = BatchSummary::from_scored(&scored);
        tracing::info!(
            file = %name,
            total = summary.total,
            suspicious = summary.suspicious,
            "File scored"
        );

        println!("{}", serde_json::to_string(&PredictionResponse::from_scored(&scored))?);
    }

    Ok(())
}
