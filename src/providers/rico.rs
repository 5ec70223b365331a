use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};
use std::str::FromStr;
use tracing::{debug, instrument, warn};

use crate::core::config::SourceConfig;
use crate::core::rate::{Rate, RateSource};

/// Where the USD rate lives in the page: the first row matched by `row`,
/// then the first two cells matched by `cell` inside it.
#[derive(Debug, Clone)]
pub struct RateSelectors {
    row: Selector,
    cell: Selector,
}

impl RateSelectors {
    pub fn new(row: &str, cell: &str) -> Result<Self> {
        let row_selector =
            Selector::parse(row).map_err(|e| anyhow!("Invalid row selector {row:?}: {e}"))?;
        let cell_selector =
            Selector::parse(cell).map_err(|e| anyhow!("Invalid cell selector {cell:?}: {e}"))?;
        Ok(Self {
            row: row_selector,
            cell: cell_selector,
        })
    }
}

/// Extracts the buy/sell pair from the page. Missing or unparseable cells
/// come back as zero and are logged; callers decide what a zero means.
pub fn scrape_rate(html: &str, selectors: &RateSelectors) -> Rate {
    let doc = Html::parse_document(html);

    let Some(row) = doc.select(&selectors.row).next() else {
        warn!("Currency row not found in page");
        return Rate::ZERO;
    };

    let mut cells = row.select(&selectors.cell);
    let buy = parse_cell(cells.next(), "buy");
    let sell = parse_cell(cells.next(), "sell");

    Rate::new(buy, sell)
}

fn parse_cell(cell: Option<ElementRef<'_>>, side: &str) -> Decimal {
    let Some(cell) = cell else {
        warn!(side, "Rate cell not found in currency row");
        return Decimal::ZERO;
    };

    let text: String = cell.text().collect();
    match parse_decimal(&text) {
        Ok(value) if value.is_sign_negative() => {
            warn!(side, %value, "Negative rate in page");
            Decimal::ZERO
        }
        Ok(value) => value,
        Err(e) => {
            warn!(side, text = %text.trim(), error = %e, "Failed to parse rate cell");
            Decimal::ZERO
        }
    }
}

/// Parses a rate written with either a comma or a period as the decimal
/// separator.
pub fn parse_decimal(text: &str) -> Result<Decimal, rust_decimal::Error> {
    Decimal::from_str(&normalize_decimal_string(text.trim()))
}

fn normalize_decimal_string(s: &str) -> String {
    s.replace(',', ".")
}

pub struct RicoRateSource {
    url: String,
    selectors: RateSelectors,
    client: reqwest::Client,
}

impl RicoRateSource {
    pub fn new(url: &str, selectors: RateSelectors, client: reqwest::Client) -> Self {
        RicoRateSource {
            url: url.to_string(),
            selectors,
            client,
        }
    }

    pub fn from_config(config: &SourceConfig, client: reqwest::Client) -> Result<Self> {
        let selectors = RateSelectors::new(&config.row_selector, &config.cell_selector)?;
        Ok(Self::new(&config.url, selectors, client))
    }
}

#[async_trait]
impl RateSource for RicoRateSource {
    #[instrument(name = "RicoRateFetch", skip(self), fields(url = %self.url))]
    async fn fetch_rate(&self) -> Result<Rate> {
        debug!("Requesting rate page");
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, self.url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for URL: {}",
                response.status(),
                self.url
            ));
        }

        let body = response
            .text()
            .await
            .context("Failed to get response text")?;
        if body.trim().is_empty() {
            return Err(anyhow!("Empty response body for URL: {}", self.url));
        }

        let rate = scrape_rate(&body, &self.selectors);
        debug!(%rate, "Scraped rate");
        Ok(rate)
    }
}
