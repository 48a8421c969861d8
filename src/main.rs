//! Pico y placa server.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 PICO-PLACA                    │
//!                        │                                               │
//!     request line       │  ┌──────────┐   ┌─────────┐   ┌────────────┐ │
//!     ───────────────────┼─▶│   net    │──▶│  codec  │──▶│ dispatcher │ │
//!                        │  │ listener │   │ decode  │   │            │ │
//!                        │  └──────────┘   └─────────┘   └─────┬──────┘ │
//!                        │                                     │        │
//!                        │                     ┌───────────────┤        │
//!                        │                     ▼               ▼        │
//!                        │              ┌────────────┐  ┌────────────┐  │
//!                        │              │   plate    │  │  counters  │  │
//!                        │              └────────────┘  └────────────┘  │
//!     response line      │  ┌──────────┐   ┌─────────┐         │        │
//!     ◀──────────────────┼──│   net    │◀──│  codec  │◀────────┘        │
//!                        │  │ framing  │   │ encode  │                  │
//!                        │  └──────────┘   └─────────┘                  │
//!                        │                                               │
//!                        │  config · observability · lifecycle          │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use pico_placa::config::{load_config, validate_config, ConfigError, ServerConfig};
use pico_placa::lifecycle::{self, signals, Shutdown};
use pico_placa::observability::logging;
use pico_placa::Server;

#[derive(Parser)]
#[command(name = "pico-placa")]
#[command(about = "Plate restriction line protocol server", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overriding the config file.
    #[arg(short, long)]
    bind: Option<String>,
}

fn resolve_config(cli: &Cli) -> Result<ServerConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("pico-placa v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_connections = config.listener.max_connections,
        idle_secs = config.timeouts.idle_secs,
        max_line_bytes = config.limits.max_line_bytes,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let running = lifecycle::launch(Server::new(config), &shutdown).await?;
    tracing::info!(address = %running.local_addr, "Listening for connections");

    signals::wait_for_shutdown_signal().await;
    let notified = shutdown.trigger();
    tracing::info!(tasks = notified, "Shutdown signal sent");

    running.handle.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
