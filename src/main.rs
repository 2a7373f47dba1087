use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use meteodash::{DashboardError, MeteoDashConfig, OpenMeteo, WeatherService, logging, web};

/// Weather dashboard backed by the Open-Meteo APIs
#[derive(Parser)]
#[command(name = "meteodash", version, about = "Open-Meteo weather dashboard")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the dashboard (default)
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Look up a place and print the matching candidates
    Search {
        query: String,
        #[arg(long)]
        count: Option<u8>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = MeteoDashConfig::load_from_path(cli.config)?;
    logging::init(&config.logging, cli.verbose);

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            info!("Starting meteodash {}", meteodash::VERSION);
            web::run(&config).await
        }
        Command::Search { query, count } => {
            let count = count.unwrap_or(config.defaults.max_results);
            search(&config, &query, count).await
        }
    }
}

async fn search(config: &MeteoDashConfig, query: &str, count: u8) -> Result<()> {
    let service = OpenMeteo::new(config)?;
    let candidates = service.search(query, count).await?;
    if candidates.is_empty() {
        return Err(DashboardError::empty_result(query.trim()).into());
    }

    for (index, candidate) in candidates.iter().enumerate() {
        println!(
            "{index:>2}. {}  [{}]  {}",
            candidate.display_name,
            candidate.format_coordinates(),
            candidate.timezone_or_default()
        );
    }
    Ok(())
}
