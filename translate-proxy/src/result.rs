//! The normalized body returned to clients

use crate::error::{ProxyResult, TranslateError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Either `{"translatedText": ...}` or `{"error": ..., "details": ...}`
///
/// Being an enum, a result can never carry both a translation and an error,
/// and can never carry neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationResult {
    Success {
        #[serde(rename = "translatedText")]
        translated_text: String,
    },
    Failure {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<Value>,
    },
}

impl TranslationResult {
    pub fn success(translated_text: impl Into<String>) -> Self {
        TranslationResult::Success {
            translated_text: translated_text.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TranslationResult::Success { .. })
    }

    pub fn translated_text(&self) -> Option<&str> {
        match self {
            TranslationResult::Success { translated_text } => Some(translated_text),
            TranslationResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            TranslationResult::Success { .. } => None,
            TranslationResult::Failure { error, .. } => Some(error),
        }
    }
}

impl From<&TranslateError> for TranslationResult {
    fn from(err: &TranslateError) -> Self {
        TranslationResult::Failure {
            error: err.to_string(),
            details: err.details(),
        }
    }
}

impl From<ProxyResult<String>> for TranslationResult {
    fn from(result: ProxyResult<String>) -> Self {
        match result {
            Ok(text) => TranslationResult::success(text),
            Err(err) => TranslationResult::from(&err),
        }
    }
}
