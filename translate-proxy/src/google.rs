//! Google Translate API v2 adapter
//!
//! The API key travels as the `key` query parameter; the request body is
//! `{q, source, target, format}` and a successful answer looks like
//! `{"data": {"translations": [{"translatedText": "..."}]}}`.

use crate::error::{ProxyResult, TranslateError};
use crate::provider::{TranslationProvider, http_client, parse_body, post_json};
use crate::request::TranslationRequest;
use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Google Translate API v2 provider
#[derive(Clone)]
pub struct GoogleTranslateProvider {
    /// API key for authentication
    api_key: String,
    /// HTTP client carrying the configured timeout
    client: reqwest::Client,
    /// Translate endpoint, without the key
    endpoint: Url,
}

#[derive(Serialize)]
struct GooglePayload<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

impl GoogleTranslateProvider {
    /// Create a new provider with an explicit API key
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - New provider instance
    /// * `Err(TranslateError::Configuration)` - If the key is empty or the HTTP client cannot be built
    pub fn new(api_key: String, endpoint: Url, timeout: Duration) -> ProxyResult<Self> {
        if api_key.trim().is_empty() {
            return Err(TranslateError::Configuration(
                "API key cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            client: http_client(timeout)?,
            endpoint,
        })
    }

    fn request_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("key", &self.api_key);
        url
    }

    /// Pull `data.translations[0].translatedText` out of a 2xx body
    fn extract_translation(body: &str) -> ProxyResult<String> {
        let json = parse_body(body)?;
        let violation = |reason: &str| TranslateError::UpstreamContractViolation {
            reason: reason.to_string(),
            body: body.to_string(),
        };

        let translations = json["data"]["translations"]
            .as_array()
            .ok_or_else(|| violation("missing 'data.translations' array"))?;

        let first = translations
            .first()
            .ok_or_else(|| violation("'data.translations' array is empty"))?;

        first["translatedText"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| violation("missing 'translatedText' field"))
    }
}

impl std::fmt::Debug for GoogleTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslateProvider")
            .field("api_key", &"***")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslateProvider {
    async fn translate(&self, request: &TranslationRequest) -> ProxyResult<String> {
        let payload = GooglePayload {
            q: &request.q,
            source: &request.source,
            target: &request.target,
            format: request.format.as_str(),
        };

        debug!("POST {} ({} -> {})", self.endpoint, request.source, request.target);
        let body = post_json(&self.client, self.request_url(), &payload).await?;
        Self::extract_translation(&body)
    }

    fn provider_name(&self) -> &str {
        "Google Translate"
    }
}
