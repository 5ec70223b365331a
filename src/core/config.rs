use anyhow::{Context, Result, anyhow};
use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourceConfig {
    #[serde(default = "default_source_url")]
    pub url: String,
    /// Selects the currency rows; only the first match is read.
    #[serde(default = "default_row_selector")]
    pub row_selector: String,
    /// Selects the rate cells inside the row, buy first then sell.
    #[serde(default = "default_cell_selector")]
    pub cell_selector: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            url: default_source_url(),
            row_selector: default_row_selector(),
            cell_selector: default_cell_selector(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TelegramConfig {
    #[serde(default = "default_telegram_url")]
    pub base_url: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        TelegramConfig {
            base_url: default_telegram_url(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            source: SourceConfig::default(),
            telegram: TelegramConfig::default(),
            interval_secs: default_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            timezone: default_timezone(),
        }
    }
}

fn default_source_url() -> String {
    "https://www.rico.ge/ka".to_string()
}

fn default_row_selector() -> String {
    "table tbody tr".to_string()
}

fn default_cell_selector() -> String {
    "td.rate".to_string()
}

fn default_telegram_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_interval_secs() -> u64 {
    60
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_timezone() -> String {
    "Asia/Tbilisi".to_string()
}

impl AppConfig {
    /// Loads the config from the default location, falling back to defaults
    /// when no file has been set up.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("ge", "rico", "rico-watch")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn time_zone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("Failed to load timezone {}: {}", self.timezone, e))
    }

    pub fn interval(&self) -> Result<Duration> {
        bounded_secs("interval_secs", self.interval_secs)
    }

    pub fn request_timeout(&self) -> Result<Duration> {
        bounded_secs("request_timeout_secs", self.request_timeout_secs)
    }
}

/// Longest accepted interval or timeout: one day.
const MAX_SECS: u64 = 24 * 60 * 60;

fn bounded_secs(key: &str, secs: u64) -> Result<Duration> {
    if secs == 0 || secs > MAX_SECS {
        anyhow::bail!("{key} must be between 1 and {MAX_SECS} seconds, got {secs}");
    }
    Ok(Duration::from_secs(secs))
}

/// Telegram credentials, read from `TELEGRAM_BOT_TOKEN` and
/// `TELEGRAM_CHANNEL_ID`.
#[derive(Deserialize, Clone)]
pub struct Credentials {
    pub telegram_bot_token: String,
    pub telegram_channel_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("telegram_bot_token", &"<redacted>")
            .field("telegram_channel_id", &self.telegram_channel_id)
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let creds: Self = envy::from_iter(vars)
            .context("TELEGRAM_BOT_TOKEN and TELEGRAM_CHANNEL_ID must be set in the environment")?;
        if creds.telegram_bot_token.trim().is_empty() || creds.telegram_channel_id.trim().is_empty()
        {
            anyhow::bail!("TELEGRAM_BOT_TOKEN and TELEGRAM_CHANNEL_ID must not be empty");
        }
        Ok(creds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_empty_yaml() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.source.url, "https://www.rico.ge/ka");
        assert_eq!(config.source.row_selector, "table tbody tr");
        assert_eq!(config.source.cell_selector, "td.rate");
        assert_eq!(config.telegram.base_url, "https://api.telegram.org");
        assert_eq!(config.interval_secs, 60);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.time_zone().unwrap(), chrono_tz::Asia::Tbilisi);
    }

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
source:
  url: "http://example.com/rates"
  cell_selector: "td.currency-value"
telegram:
  base_url: "http://example.com/telegram"
interval_secs: 30
timezone: "Europe/Berlin"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.source.url, "http://example.com/rates");
        assert_eq!(config.source.row_selector, "table tbody tr");
        assert_eq!(config.source.cell_selector, "td.currency-value");
        assert_eq!(config.telegram.base_url, "http://example.com/telegram");
        assert_eq!(config.interval().unwrap(), Duration::from_secs(30));
        assert_eq!(config.request_timeout().unwrap(), Duration::from_secs(10));
        assert_eq!(config.time_zone().unwrap(), chrono_tz::Europe::Berlin);
    }

    #[test]
    fn test_invalid_timezone_is_rejected() {
        let config = AppConfig {
            timezone: "Mars/Olympus_Mons".to_string(),
            ..AppConfig::default()
        };
        let err = config.time_zone().unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus_Mons"));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let config = AppConfig {
            interval_secs: 0,
            ..AppConfig::default()
        };
        assert!(config.interval().is_err());
    }

    #[test]
    fn test_huge_interval_is_rejected() {
        let config = AppConfig {
            interval_secs: u64::MAX,
            ..AppConfig::default()
        };
        let err = config.interval().unwrap_err();
        assert!(err.to_string().contains("interval_secs"));

        let config = AppConfig {
            interval_secs: 24 * 60 * 60,
            ..AppConfig::default()
        };
        assert_eq!(config.interval().unwrap(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_request_timeout_bounds() {
        let zero = AppConfig {
            request_timeout_secs: 0,
            ..AppConfig::default()
        };
        let err = zero.request_timeout().unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));

        let huge = AppConfig {
            request_timeout_secs: u64::MAX,
            ..AppConfig::default()
        };
        assert!(huge.request_timeout().is_err());
    }

    #[test]
    fn test_load_from_path() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("config.yaml");
        fs::write(&path, "interval_secs: 120\n")?;

        let config = AppConfig::load_from_path(&path)?;
        assert_eq!(config.interval_secs, 120);
        assert_eq!(config.timezone, "Asia/Tbilisi");

        assert!(AppConfig::load_from_path(dir.path().join("missing.yaml")).is_err());
        Ok(())
    }

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_credentials_from_env() {
        let creds = Credentials::from_vars(vars(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("TELEGRAM_CHANNEL_ID", "@rates"),
            ("HOME", "/root"),
        ]))
        .unwrap();
        assert_eq!(creds.telegram_bot_token, "123:abc");
        assert_eq!(creds.telegram_channel_id, "@rates");
        assert!(!format!("{creds:?}").contains("123:abc"));
    }

    #[test]
    fn test_credentials_missing_or_empty() {
        assert!(Credentials::from_vars(vars(&[("TELEGRAM_BOT_TOKEN", "123:abc")])).is_err());
        assert!(
            Credentials::from_vars(vars(&[
                ("TELEGRAM_BOT_TOKEN", ""),
                ("TELEGRAM_CHANNEL_ID", "@rates"),
            ]))
            .is_err()
        );
    }
}
