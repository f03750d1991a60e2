//! Webhook error types.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebhookError {
    /// The upstream returned a non-success status. `details` carries the
    /// response body, or the original request payload when the body was not
    /// parseable JSON.
    #[error("Webhook call to {url} failed with status {status}")]
    Upstream {
        url: String,
        status: u16,
        details: Value,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid temporal input: {0}")]
    Temporal(#[from] agenda_temporal::TemporalError),
}

impl WebhookError {
    /// Upstream HTTP status, when one was received. Request handlers map this
    /// to a gateway-style response code, defaulting to a generic server error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::Temporal(_) => None,
        }
    }

    /// Body (or echoed payload) returned by the upstream, for diagnostics.
    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::Upstream { details, .. } => Some(details),
            _ => None,
        }
    }

    /// User-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Upstream { status, .. } if *status >= 500 => {
                "The scheduling service is experiencing issues. Please try again later."
            }
            Self::Upstream { .. } => "The scheduling service rejected the request.",
            Self::Network(_) => "Network error. Check your connection.",
            Self::Temporal(_) => "A date could not be interpreted. Check the input.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upstream_exposes_status_and_details() {
        let err = WebhookError::Upstream {
            url: "https://automation.example.com/webhook/ver-agenda".into(),
            status: 502,
            details: json!({"error": "fail"}),
        };
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.details(), Some(&json!({"error": "fail"})));
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_temporal_has_no_status() {
        let err = WebhookError::Temporal(agenda_temporal::TemporalError::InvalidFormat(
            "bogus".into(),
        ));
        assert_eq!(err.status(), None);
        assert!(err.details().is_none());
        assert!(!err.user_message().is_empty());
    }
}
