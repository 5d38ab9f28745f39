//! Error types for the translation proxy

use serde_json::{Value, json};

/// Every way a translation can fail, from client input through the upstream call.
///
/// Per-request variants are turned into a
/// [`TranslationResult::Failure`](crate::result::TranslationResult) at the
/// [`Translator`](crate::translator::Translator) boundary. `Configuration` is
/// only produced while building a provider at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    /// Malformed client input, no upstream call was made
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Upstream could not be reached or did not answer in time
    #[error("Upstream unavailable: {reason}")]
    UpstreamUnavailable { reason: String, timed_out: bool },

    /// Upstream answered with a non-2xx status
    #[error("Upstream returned status {status}")]
    UpstreamError { status: u16, body: String },

    /// Upstream answered 2xx with a body we could not read
    #[error("Unexpected upstream response: {reason}")]
    UpstreamContractViolation { reason: String, body: String },

    /// Missing or invalid provider configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl TranslateError {
    pub fn timeout(after: std::time::Duration) -> Self {
        TranslateError::UpstreamUnavailable {
            reason: format!("request timed out after {} ms", after.as_millis()),
            timed_out: true,
        }
    }

    /// Short machine-readable name of the variant, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TranslateError::BadRequest(_) => "BadRequest",
            TranslateError::UpstreamUnavailable { .. } => "UpstreamUnavailable",
            TranslateError::UpstreamError { .. } => "UpstreamError",
            TranslateError::UpstreamContractViolation { .. } => "UpstreamContractViolation",
            TranslateError::Configuration(_) => "ConfigurationError",
        }
    }

    /// Structured detail attached to the error body sent back to the client.
    pub fn details(&self) -> Option<Value> {
        match self {
            TranslateError::BadRequest(_) | TranslateError::Configuration(_) => None,
            TranslateError::UpstreamUnavailable { reason, .. } => Some(json!({ "reason": reason })),
            TranslateError::UpstreamError { status, body } => {
                Some(json!({ "status": status, "body": body }))
            }
            TranslateError::UpstreamContractViolation { body, .. } => Some(json!({ "body": body })),
        }
    }
}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        let timed_out = e.is_timeout();
        // The request URL can carry the provider key as a query parameter
        TranslateError::UpstreamUnavailable {
            reason: e.without_url().to_string(),
            timed_out,
        }
    }
}

/// Result type for proxy operations
pub type ProxyResult<T> = Result<T, TranslateError>;
