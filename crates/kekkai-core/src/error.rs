//! Error taxonomy.
//!
//! Player actions fail with [`ActionRejected`]: the action becomes a no-op
//! and the simulation also emits a feedback message. Configuration loading
//! fails with [`ConfigError`].

use thiserror::Error;

/// A player action that violated a domain rule.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionRejected {
    #[error("not enough spiritual power: need {needed:.1}, have {available:.1}")]
    InsufficientResource { needed: f64, available: f64 },
    #[error("no barrier targeted")]
    NoTarget,
    #[error("barrier is already being destroyed")]
    AlreadyShrinking,
    #[error("session is not active")]
    NotActive,
    #[error("ability not available in this mode")]
    AbilityUnavailable,
}

/// A mode configuration that could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
