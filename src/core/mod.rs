//! Core abstractions: the rate value, its source, notifications and the
//! process-wide settings.

pub mod config;
pub mod log;
pub mod notify;
pub mod rate;
pub mod shutdown;

// Re-export main types for cleaner imports
pub use notify::Notifier;
pub use rate::{Rate, RateSource};
pub use shutdown::Shutdown;
