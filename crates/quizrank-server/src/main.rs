use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use quizrank_core::config::BackendKind;
use quizrank_infrastructure::ConfigService;
use quizrank_server::{bootstrap, logging, serve};

#[derive(Parser)]
#[command(name = "quizrank")]
#[command(about = "Quizrank - leaderboard service for the quiz platform", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = "QUIZRANK_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on (overrides config)
    #[arg(long)]
    bind: Option<String>,

    /// Storage backend (overrides config)
    #[arg(long, value_parser = parse_backend)]
    backend: Option<BackendKind>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn parse_backend(value: &str) -> Result<BackendKind, String> {
    value.parse().map_err(|e: quizrank_core::LeaderboardError| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigService::load(cli.config.as_deref()).await?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if cli.log_json {
        config.logging.json = true;
    }

    logging::init_tracing(&config.logging)?;
    tracing::info!("[Bootstrap] Starting with {:?} backend", config.backend);

    let state = bootstrap::build_state(config).await?;
    serve(state).await
}
