use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::core::config::Credentials;
use crate::core::notify::{Notifier, format_message};
use crate::core::rate::Rate;

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    description: Option<String>,
}

/// Posts rate changes to a Telegram channel through the Bot API.
pub struct TelegramNotifier {
    base_url: String,
    bot_token: String,
    channel_id: String,
    time_zone: Tz,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(
        base_url: &str,
        credentials: &Credentials,
        time_zone: Tz,
        client: reqwest::Client,
    ) -> Self {
        TelegramNotifier {
            base_url: base_url.trim_end_matches('/').to_string(),
            bot_token: credentials.telegram_bot_token.clone(),
            channel_id: credentials.telegram_channel_id.clone(),
            time_zone,
            client,
        }
    }

    /// Sends `text` to the configured channel.
    #[instrument(name = "TelegramSend", skip(self, text), fields(chat_id = %self.channel_id))]
    pub async fn send_text(&self, text: &str) -> Result<()> {
        let endpoint = format!("{}/bot{}/sendMessage", self.base_url, self.bot_token);
        let url = reqwest::Url::parse_with_params(
            &endpoint,
            &[("chat_id", self.channel_id.as_str()), ("text", text)],
        )
        .context("Invalid Telegram API URL")?;

        // The URL carries the bot token, keep it out of error messages.
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error sending Telegram message: {}", e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let description = response
                .json::<TelegramResponse>()
                .await
                .ok()
                .and_then(|r| r.description)
                .unwrap_or_else(|| "no description".to_string());
            return Err(anyhow!(
                "Telegram returned HTTP {}: {}",
                status,
                description
            ));
        }

        info!(message = %text, "Message sent");
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_notification(&self, rate: &Rate) -> Result<()> {
        let now = Utc::now().with_timezone(&self.time_zone);
        let text = format_message(rate, &now);
        self.send_text(&text).await
    }
}
