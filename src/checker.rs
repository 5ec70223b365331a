//! One fetch → parse → compare → notify cycle, and the state it carries
//! between cycles.

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::core::{Notifier, Rate, RateSource, Shutdown};

/// Why a cycle stopped before completing normally.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("failed to fetch current rate: {0:#}")]
    Fetch(anyhow::Error),
    #[error("fetched an invalid rate ({0}), page layout may have changed")]
    InvalidRate(Rate),
    #[error("failed to send notification: {0:#}")]
    Notify(anyhow::Error),
    #[error("check cancelled by shutdown")]
    Cancelled,
}

#[derive(Debug)]
pub enum CheckOutcome {
    /// Fetched rate equals the stored one.
    Unchanged,
    /// Stored rate was replaced. `notified` is false when the send failed or
    /// was cancelled; the new rate stays stored either way.
    Changed { rate: Rate, notified: bool },
    /// Cycle aborted before comparing; stored rate untouched.
    Skipped(CheckError),
}

pub struct RateChecker {
    last_rate: Rate,
    source: Box<dyn RateSource>,
    notifier: Box<dyn Notifier>,
}

impl RateChecker {
    pub fn new(source: Box<dyn RateSource>, notifier: Box<dyn Notifier>) -> Self {
        RateChecker {
            last_rate: Rate::ZERO,
            source,
            notifier,
        }
    }

    /// The last valid rate seen, or [`Rate::ZERO`] before the first one.
    pub fn last_rate(&self) -> Rate {
        self.last_rate
    }

    /// Runs one cycle. Every failure is logged and absorbed; the outcome is
    /// returned for callers that want to inspect it.
    pub async fn check_for_change(&mut self, shutdown: &Shutdown) -> CheckOutcome {
        let outcome = self.run_cycle(shutdown).await;
        match &outcome {
            CheckOutcome::Unchanged => debug!(rate = %self.last_rate, "Rate unchanged"),
            CheckOutcome::Changed { rate, notified } => {
                info!(%rate, notified, "Rate changed")
            }
            CheckOutcome::Skipped(CheckError::Cancelled) => info!("Check cancelled"),
            CheckOutcome::Skipped(e) => error!(error = %e, "Rate check skipped"),
        }
        outcome
    }

    async fn run_cycle(&mut self, shutdown: &Shutdown) -> CheckOutcome {
        if shutdown.is_triggered() {
            return CheckOutcome::Skipped(CheckError::Cancelled);
        }

        let fetched = tokio::select! {
            biased;
            _ = shutdown.triggered() => return CheckOutcome::Skipped(CheckError::Cancelled),
            res = self.source.fetch_rate() => res,
        };

        let current = match fetched {
            Ok(rate) => rate,
            Err(e) => return CheckOutcome::Skipped(CheckError::Fetch(e)),
        };

        if !current.is_valid() {
            return CheckOutcome::Skipped(CheckError::InvalidRate(current));
        }

        if current == self.last_rate {
            return CheckOutcome::Unchanged;
        }

        self.last_rate = current;

        let sent = tokio::select! {
            biased;
            _ = shutdown.triggered() => Err(CheckError::Cancelled),
            res = self.notifier.send_notification(&current) => res.map_err(CheckError::Notify),
        };

        let notified = match sent {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Notification not delivered, keeping new rate as baseline");
                false
            }
        };

        CheckOutcome::Changed {
            rate: current,
            notified,
        }
    }
}
