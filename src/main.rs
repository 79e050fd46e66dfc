use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{
    AviaryCommand, BatchCommand, ConfigCommand, CountCommand, RemoteCommand, SubmitCommand,
};
use config::Config;

#[derive(Parser)]
#[command(name = "tally")]
#[command(version)]
#[command(about = "Egg collection tally for poultry farms", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage batches
    Batch(BatchCommand),

    /// Manage aviaries of the selected batch
    Aviary(AviaryCommand),

    /// Record and inspect category tallies
    Count(CountCommand),

    /// Submit all tallies for the selected aviary
    Submit(SubmitCommand),

    /// Query the collection backend
    Remote(RemoteCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cli_config_path = cli.config.clone();
    let config = Config::load(cli.config)?;
    tracing::debug!("Using data dir {}", config.data_dir.value.display());

    match cli.command {
        Some(Commands::Batch(cmd)) => {
            let mut store = commands::open_store(&config)?;
            cmd.run(&mut store)?;
        }
        Some(Commands::Aviary(cmd)) => {
            let mut store = commands::open_store(&config)?;
            cmd.run(&mut store)?;
        }
        Some(Commands::Count(cmd)) => {
            let mut store = commands::open_store(&config)?;
            cmd.run(&mut store)?;
        }
        Some(Commands::Submit(cmd)) => {
            let mut store = commands::open_store(&config)?;
            let api = commands::api_client(&config)?;
            cmd.run(&mut store, &api).await?;
        }
        Some(Commands::Remote(cmd)) => {
            let api = commands::api_client(&config)?;
            cmd.run(&config, &api).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config, cli_config_path)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
