pub mod checker;
pub mod cli;
pub mod core;
pub mod providers;
pub mod scheduler;

use crate::checker::RateChecker;
use crate::core::Shutdown;
use crate::core::config::{AppConfig, Credentials};
use crate::providers::rico::RicoRateSource;
use crate::providers::telegram::TelegramNotifier;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Watch,
    Fetch,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("rico-watch starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Watch => {
            let credentials = Credentials::from_env()?;
            let shutdown = Shutdown::new();
            core::shutdown::listen_for_signals(shutdown.clone());
            watch(&config, &credentials, &shutdown).await
        }
        AppCommand::Fetch => cli::fetch::run(&config).await,
    }
}

/// Wires the source, notifier and checker from `config` and runs the
/// scheduler until `shutdown` fires. Errors only on invalid settings.
pub async fn watch(
    config: &AppConfig,
    credentials: &Credentials,
    shutdown: &Shutdown,
) -> Result<()> {
    let time_zone = config.time_zone()?;
    let interval = config.interval()?;
    let client = providers::http_client(config.request_timeout()?)?;

    let source = RicoRateSource::from_config(&config.source, client.clone())?;
    let notifier =
        TelegramNotifier::new(&config.telegram.base_url, credentials, time_zone, client);
    let mut checker = RateChecker::new(Box::new(source), Box::new(notifier));

    scheduler::run(&mut checker, interval, shutdown).await;

    info!(last_rate = %checker.last_rate(), "rico-watch stopped");
    Ok(())
}
