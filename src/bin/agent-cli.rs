use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use rule_agent::config::load_config;
use rule_agent::remote::pagination::fetch_all;
use rule_agent::remote::{HttpSource, RemoteSource};
use rule_agent::{RefreshOutcome, SyncClient};

#[derive(Parser)]
#[command(name = "agent-cli")]
#[command(about = "Inspect what the manager serves to a rule agent", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "agent.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current rule version
    Version,
    /// Dump every redirect rule
    Redirects,
    /// Dump every page rule
    Pages,
    /// Run one full sync and summarize the snapshot
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Version => {
            let source = HttpSource::new(config)?;
            println!("{}", source.version().await?);
        }
        Commands::Redirects => {
            let source = HttpSource::new(config)?;
            let rules = fetch_all(|offset, limit| source.redirects(offset, limit)).await?;
            print_json(&rules)?;
        }
        Commands::Pages => {
            let source = HttpSource::new(config)?;
            let pages = fetch_all(|offset, limit| source.pages(offset, limit)).await?;
            print_json(&pages)?;
        }
        Commands::Check => {
            let client = SyncClient::from_config(&config)?;
            let outcome = client.initialize().await?;
            let snapshot = client.snapshot();
            let elapsed = match outcome {
                RefreshOutcome::Rebuilt { elapsed, .. } => Some(format!("{:?}", elapsed)),
                _ => None,
            };
            print_json(&serde_json::json!({
                "version": snapshot.version(),
                "redirects": snapshot.redirect_count(),
                "pages": snapshot.page_count(),
                "load_duration": elapsed,
            }))?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
