use std::path::Path;

use anyhow::{anyhow, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "events-backend";

/// Console logging, plus a daily rolling file when `log_dir` is set. Keep the
/// returned guard alive for as long as file output is wanted.
pub fn init_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = tracing_subscriber::fmt::layer();

    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console)
            .try_init()
            .map_err(|err| anyhow!("failed to init logging: {}", err))?;
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .map_err(|err| anyhow!("failed to create log directory '{}': {}", dir.display(), err))?;
    let (writer, guard) = non_blocking(rolling::daily(dir, LOG_FILE_PREFIX));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()
        .map_err(|err| anyhow!("failed to init logging: {}", err))?;
    info!(dir = %dir.display(), "logging to daily files");
    Ok(Some(guard))
}
