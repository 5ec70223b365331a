//! Exchange rate value type and the source abstraction

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Display;

/// USD buy/sell pair as published by the exchange office.
///
/// Equality is exact. A rate with either side at zero is never a real
/// observation; it is what the scraper yields when the page did not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rate {
    pub buy: Decimal,
    pub sell: Decimal,
}

impl Rate {
    pub const ZERO: Rate = Rate {
        buy: Decimal::ZERO,
        sell: Decimal::ZERO,
    };

    pub fn new(buy: Decimal, sell: Decimal) -> Self {
        Self { buy, sell }
    }

    pub fn is_valid(&self) -> bool {
        !self.buy.is_zero() && !self.sell.is_zero()
    }
}

/// Digits shown wherever a rate is rendered.
pub const DISPLAY_DP: u32 = 4;

/// Rounds half away from zero to [`DISPLAY_DP`] places; `{:.4}` alone
/// truncates on `Decimal`.
pub fn display_value(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_DP, RoundingStrategy::MidpointAwayFromZero)
}

impl Display for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "buy {:.4} / sell {:.4}",
            display_value(self.buy),
            display_value(self.sell)
        )
    }
}

#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetches the page and extracts the current rate. The returned rate may
    /// be zero-valued when the markup did not contain parseable cells.
    async fn fetch_rate(&self) -> Result<Rate>;
}
