//! proglog HTTP server binary entry point.

use std::sync::Arc;

use clap::Parser;
use proglog_log::Log;
use proglog_logging::ProglogSubscriberBuilder;
use proglog_server::{Cli, LogServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_config()?;

    // Keep the guard alive so file output is flushed on exit
    let _guard = ProglogSubscriberBuilder::new()
        .with_config(config.logging.clone())
        .try_init()?;

    tracing::info!(addr = %config.addr, max_records = ?config.log.max_records, "Opening log");

    let log = Arc::new(Log::with_config(config.log.clone()));
    LogServer::new(log, config).run().await?;

    Ok(())
}
