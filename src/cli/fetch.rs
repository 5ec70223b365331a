use super::ui;
use crate::core::RateSource;
use crate::core::config::AppConfig;
use crate::core::rate::Rate;
use crate::providers;
use crate::providers::rico::RicoRateSource;
use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use comfy_table::{Cell, Table};

/// Fetches the page once and prints what was scraped. Never notifies.
pub async fn run(config: &AppConfig) -> Result<()> {
    let time_zone = config.time_zone()?;
    let client = providers::http_client(config.request_timeout()?)?;
    let source = RicoRateSource::from_config(&config.source, client)?;

    let rate = source.fetch_rate().await?;
    let now = Utc::now().with_timezone(&time_zone);
    println!("{}", rate_table(&rate, &now));

    if !rate.is_valid() {
        anyhow::bail!(
            "No valid rate found at {}, check source.row_selector and source.cell_selector",
            config.source.url
        );
    }
    Ok(())
}

pub fn rate_table<Tz>(rate: &Rate, at: &DateTime<Tz>) -> Table
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Buy"),
        ui::header_cell("Sell"),
        ui::header_cell("Fetched at"),
    ]);
    table.add_row(vec![
        Cell::new("USD"),
        ui::rate_cell(rate.buy),
        ui::rate_cell(rate.sell),
        Cell::new(at.format("%Y-%m-%d %H:%M:%S %Z")),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_rate_table_renders_values() {
        let rate = Rate::new("2.7".parse().unwrap(), "2.75499".parse().unwrap());
        let at = chrono_tz::Asia::Tbilisi
            .with_ymd_and_hms(2025, 3, 1, 12, 30, 0)
            .unwrap();

        let rendered = rate_table(&rate, &at).to_string();

        assert!(rendered.contains("USD"));
        assert!(rendered.contains("2.7000"));
        assert!(rendered.contains("2.7550"));
        assert!(rendered.contains("2025-03-01 12:30:00"));
    }

    #[test]
    fn test_rate_table_marks_missing_side() {
        let rate = Rate::new("2.7".parse().unwrap(), Decimal::ZERO);
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap();

        let rendered = rate_table(&rate, &at).to_string();

        assert!(rendered.contains("N/A"));
    }
}
