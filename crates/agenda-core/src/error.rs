//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    MissingSetting(String),

    #[error("Invalid webhook URL in {name}: {message}")]
    InvalidUrl { name: String, message: String },

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

impl ConfigError {
    /// User-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::MissingSetting(_) => "A required setting is missing. Check your settings.",
            ConfigError::InvalidUrl { .. } => "A webhook URL is malformed. Check your settings.",
            ConfigError::UnknownTimezone(_) => "The configured timezone is not recognized.",
        }
    }
}
