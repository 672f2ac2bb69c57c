//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins over the configured level when set.

use anyhow::{Result, anyhow};
use quizrank_core::config::LoggingSettings;
use tracing_subscriber::{EnvFilter, fmt};

pub fn init_tracing(settings: &LoggingSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| anyhow!("Invalid log level '{}': {}", settings.level, e))?;

    let builder = fmt().with_env_filter(filter).with_target(true);

    if settings.json {
        builder
            .json()
            .try_init()
            .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))
    } else {
        builder
            .try_init()
            .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))
    }
}
