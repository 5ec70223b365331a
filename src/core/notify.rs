//! Notification abstractions

use super::rate::{Rate, display_value};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone};

const TIME_FORMAT: &str = "%b %-d %H:%M:%S";

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_notification(&self, rate: &Rate) -> Result<()>;
}

/// Renders the channel message for a rate observed at `at`.
pub fn format_message<Tz>(rate: &Rate, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{} - 1$ ყიდვა {:.4} / გაყიდვა {:.4}",
        at.format(TIME_FORMAT),
        display_value(rate.buy),
        display_value(rate.sell)
    )
}
