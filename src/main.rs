use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cotacao::config::{default_config_path, Config};
use cotacao::quote::QuoteService;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "cotacao")]
#[command(about = "Consolidated crypto quotes: CoinGecko price plus synthetic volume")]
struct Cli {
    /// Path to config file (defaults to ./cotacao.toml or the XDG data dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the resolved configuration
    Config,
    /// Fetch one consolidated quote and print it as JSON
    Quote {
        /// Asset identifier as known upstream (e.g. "bitcoin")
        asset: String,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init();
    } else {
        tracing_subscriber::registry().with(filter).with(layer).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config: {}", config_path.display()))?;

    match cli.command {
        Some(Command::Config) => {
            println!("# Config file: {}", config_path.display());
            print!("{}", config.to_toml()?);
        }
        Some(Command::Quote { asset }) => {
            let service = QuoteService::from_config(&config)?;
            let quote = service.consolidate(&asset).await?;
            println!("{}", serde_json::to_string_pretty(&quote)?);
        }
        None => {
            println!("Cotacao - Consolidated Crypto Quotes");
            println!("====================================\n");
            println!("Config: {}\n", config_path.display());
            println!("Commands:");
            println!("  config          Show current configuration");
            println!("  quote <asset>   Fetch one consolidated quote\n");
            println!("Run 'cotacao-server' to serve the HTTP API.");
            println!("Run 'cotacao --help' for more options.");
        }
    }

    Ok(())
}
