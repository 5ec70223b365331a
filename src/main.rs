use anyhow::Result;
use clap::{Parser, Subcommand};
use rico_watch::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Watch the rate and notify the channel on change (default)
    Watch,
    /// Fetch and print the current rate once, without notifying
    Fetch,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine, the variables may come from the environment.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = &dotenv {
        tracing::debug!(error = %e, "No .env file loaded");
    }

    let result = match cli.command {
        Some(Commands::Setup) => rico_watch::cli::setup::setup(),
        Some(Commands::Fetch) => {
            rico_watch::run_command(rico_watch::AppCommand::Fetch, cli.config_path.as_deref())
                .await
        }
        Some(Commands::Watch) | None => {
            rico_watch::run_command(rico_watch::AppCommand::Watch, cli.config_path.as_deref())
                .await
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
