//! `rico-watch setup`: drops the annotated example config where `watch` and
//! `fetch` look for it. Telegram credentials stay in the environment.

use crate::core::config::AppConfig;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");

pub fn setup() -> Result<()> {
    let path = AppConfig::default_config_path()?;
    write_example_config(path)
}

/// Writes the example config to `path`, refusing to replace an existing
/// file so local selector tweaks survive a second `setup`.
pub fn write_example_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if path.exists() {
        anyhow::bail!(
            "{} already exists; edit it or remove it before running setup again",
            path.display()
        );
    }

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create config directory {}", dir.display()))?;
    }

    std::fs::write(path, EXAMPLE_CONFIG)
        .with_context(|| format!("Cannot write example config to {}", path.display()))?;

    info!(
        path = %path.display(),
        "Wrote example config; set TELEGRAM_BOT_TOKEN and TELEGRAM_CHANNEL_ID before running watch"
    );
    Ok(())
}
