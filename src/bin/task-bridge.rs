//! # Task Bridge Server
//!
//! Loads configuration, connects the queue and result store, and serves the
//! HTTP API until Ctrl+C.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use task_bridge::bootstrap::BridgeBootstrap;
use task_bridge::config::ConfigLoader;
use task_bridge::logging::init_structured_logging;

#[derive(Parser)]
#[command(name = "task-bridge")]
#[command(about = "Synchronous HTTP front for an asynchronous task queue")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Use in-process queue and store instead of RabbitMQ and Redis
    #[arg(long)]
    in_memory: bool,

    /// Override the configured bind address
    #[arg(long)]
    bind: Option<String>,

    /// Load configuration, validate it, and exit
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::load().context("failed to load configuration")?;
    if let Some(bind) = cli.bind {
        config.web.bind_address = bind;
        config.validate().context("invalid --bind address")?;
    }

    init_structured_logging(config.logging.format);

    if cli.check_config {
        info!(environment = %config.environment, "Configuration is valid");
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let handle = if cli.in_memory {
        BridgeBootstrap::bootstrap_in_memory(config).await
    } else {
        BridgeBootstrap::bootstrap(config).await
    }
    .context("failed to start task bridge")?;

    let handle = Arc::new(handle);
    let mut server = tokio::spawn({
        let handle = Arc::clone(&handle);
        async move { handle.serve().await }
    });

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for shutdown signal")?;
            info!("Shutdown signal received");
        }
        joined = &mut server => {
            // The server ended on its own, usually because the bind failed
            handle.stop().await?;
            joined.context("web server task panicked")??;
            return Ok(());
        }
    }

    handle.stop().await?;
    if let Err(e) = server.await.context("web server task panicked")? {
        error!(error = %e, "Web server exited with error");
        return Err(e.into());
    }

    info!("Task bridge stopped");
    Ok(())
}
