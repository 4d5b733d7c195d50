use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use hemero_common::observability::{init_logging, LogConfig, LogFormat};
use hemero_config::{HarvestConfig, HarvestConfigLoader};

mod newsroom;

/// Harvest opinion articles across a fleet of remote browser sessions.
#[derive(Debug, Parser)]
#[command(name = "hemeroteca", version, about)]
struct Cli {
    /// Configuration file (YAML; environment overrides win).
    #[arg(long, default_value = "hemeroteca.yaml", env = "HEMERO_CONFIG")]
    config: PathBuf,

    /// Log directory. Falls back to HEMERO_LOG_DIR, then a per-user default.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Emit logs as JSON lines instead of text.
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins). A bad config is a startup failure.
    let config: HarvestConfig = HarvestConfigLoader::new()
        .with_file(&cli.config)
        .load()
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    init_logging(LogConfig {
        log_dir: cli.log_dir,
        emit_stderr: true,
        format: if cli.json_logs {
            LogFormat::Json
        } else {
            LogFormat::Text
        },
        ..LogConfig::default()
    })?;

    newsroom::run(config).await
}
