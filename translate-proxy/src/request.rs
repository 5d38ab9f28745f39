//! Incoming translation requests and their validation
//!
//! Clients send a [`TranslatePayload`], which mirrors the JSON body with
//! every field optional. [`TranslatePayload::validate`] turns it into a
//! [`TranslationRequest`], the only form the provider adapters accept.
//!
//! # Example
//!
//! ```ignore
//! let payload: TranslatePayload =
//!     serde_json::from_str(r#"{"q": "hello", "source": "en", "target": "es"}"#)?;
//! let request = payload.validate()?;
//! assert_eq!(request.format, TextFormat::Text);
//! ```

use crate::error::{ProxyResult, TranslateError};
use serde::Deserialize;
use std::fmt;

/// How the upstream should treat markup in `q`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextFormat {
    #[default]
    Text,
    Html,
}

impl TextFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextFormat::Text => "text",
            TextFormat::Html => "html",
        }
    }

    pub fn parse(value: &str) -> ProxyResult<Self> {
        match value {
            "text" => Ok(TextFormat::Text),
            "html" => Ok(TextFormat::Html),
            other => Err(TranslateError::BadRequest(format!(
                "'format' must be \"text\" or \"html\", got {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw request body as received from the client
///
/// `text` is accepted in place of `q` for clients written against the
/// older `/api/translate` route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TranslatePayload {
    #[serde(default, alias = "text")]
    pub q: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

impl TranslatePayload {
    pub fn new(q: &str, source: &str, target: &str) -> Self {
        Self {
            q: Some(q.to_string()),
            source: Some(source.to_string()),
            target: Some(target.to_string()),
            format: None,
        }
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    /// Check required fields and defaults, producing an immutable request
    ///
    /// # Returns
    ///
    /// * `Ok(TranslationRequest)` - All fields present and well formed
    /// * `Err(TranslateError::BadRequest)` - The first problem found
    pub fn validate(self) -> ProxyResult<TranslationRequest> {
        let q = require("q", self.q)?;
        let source = require("source", self.source)?;
        let target = require("target", self.target)?;

        validate_language("source", &source)?;
        validate_language("target", &target)?;

        let format = match self.format.as_deref() {
            None => TextFormat::default(),
            Some(value) => TextFormat::parse(value)?,
        };

        Ok(TranslationRequest {
            q,
            source,
            target,
            format,
        })
    }
}

/// A validated translation request, scoped to one client call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub q: String,
    pub source: String,
    pub target: String,
    pub format: TextFormat,
}

fn require(field: &str, value: Option<String>) -> ProxyResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(TranslateError::BadRequest(format!(
            "'{}' must not be empty",
            field
        ))),
        None => Err(TranslateError::BadRequest(format!(
            "Missing '{}' parameter",
            field
        ))),
    }
}

/// Validate that a language code has an acceptable shape
///
/// Only ASCII alphanumerics, hyphens and underscores are allowed, which
/// covers ISO 639 codes, BCP 47 tags such as `zh-Hans`, and LibreTranslate's
/// `auto` source.
pub fn validate_language(field: &str, code: &str) -> ProxyResult<()> {
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(TranslateError::BadRequest(format!(
            "Invalid characters in '{}' language code: {}",
            field, code
        )));
    }

    Ok(())
}
