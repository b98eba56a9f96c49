use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use backend_bootstrap::logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "events-backend")]
#[command(about = "Transaction event ingestion server", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    /// Listen address, overrides `bind_addr`
    #[arg(short, long)]
    bind: Option<String>,

    /// Also write logs to daily files in this directory
    #[arg(long, env = "EVENTS_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging(args.log_dir.as_deref())?;

    if let Some(config) = args.config {
        std::env::set_var("EVENTS_CONFIG", config);
    }
    if let Some(bind) = args.bind {
        std::env::set_var("EVENTS_BIND_ADDR", bind);
    }

    backend_bootstrap::run().await
}
