//! Rule agent host process.
//!
//! ```text
//! agent.toml ─▶ AgentConfig ─▶ SyncClient<HttpSource>
//!                                  │  initialize() (fatal on error)
//!                                  ├─▶ poll task ──▶ manager (version / rules / status)
//!                                  └─▶ HttpServer ─▶ redirect / page / 404
//! Ctrl+C ─▶ Shutdown::trigger() ─▶ server drains, poll loop exits
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use rule_agent::config::load_config;
use rule_agent::observability::{logging, metrics};
use rule_agent::{HttpServer, RefreshOutcome, Shutdown, SyncClient};

#[derive(Parser)]
#[command(name = "rule-agent")]
#[command(about = "Serves redirect and page rules synced from a manager", long_about = None)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "agent.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(&args.config)?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "rule-agent starting");

    tracing::info!(
        manager_url = %config.manager_url,
        namespace = %config.namespace,
        project = %config.project,
        agent = %config.agent.name,
        interval_secs = config.agent.interval_check_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let client = Arc::new(SyncClient::from_config(&config)?);
    match client.initialize().await {
        Ok(RefreshOutcome::Rebuilt { version, elapsed }) => {
            tracing::info!(version, elapsed = ?elapsed, "Initial snapshot loaded");
        }
        Ok(outcome) => tracing::info!(?outcome, "Initial refresh finished"),
        Err(e) => {
            tracing::error!(error = %e, "Initial sync failed");
            return Err(e.into());
        }
    }

    let shutdown = Shutdown::new();

    let poll_task = {
        let client = client.clone();
        let signal = shutdown.subscribe();
        tokio::spawn(async move { client.start_polling(signal).await })
    };

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    let mut server_task = tokio::spawn(HttpServer::new(client.clone()).run(listener, shutdown.subscribe()));

    let finished = tokio::select! {
        res = &mut server_task => Some(res),
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C, shutting down");
            None
        }
    };

    shutdown.trigger();
    let server_result = match finished {
        Some(res) => res,
        None => server_task.await,
    };
    poll_task.await?;
    server_result??;

    tracing::info!("Shutdown complete");
    Ok(())
}
