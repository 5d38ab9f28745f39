//! LibreTranslate adapter, also used for Argos-compatible servers
//!
//! The request body is `{q, source, target, format}` with `api_key` added
//! when one is configured. A successful answer carries `translatedText` at
//! the top level.

use crate::error::{ProxyResult, TranslateError};
use crate::provider::{TranslationProvider, http_client, parse_body, post_json};
use crate::request::TranslationRequest;
use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub struct LibreTranslateProvider {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct LibrePayload<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

impl LibreTranslateProvider {
    pub fn new(endpoint: Url, api_key: Option<String>, timeout: Duration) -> ProxyResult<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            endpoint,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    fn extract_translation(body: &str) -> ProxyResult<String> {
        let json = parse_body(body)?;
        json["translatedText"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| TranslateError::UpstreamContractViolation {
                reason: "missing 'translatedText' field".to_string(),
                body: body.to_string(),
            })
    }
}

impl std::fmt::Debug for LibreTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibreTranslateProvider")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

#[async_trait]
impl TranslationProvider for LibreTranslateProvider {
    async fn translate(&self, request: &TranslationRequest) -> ProxyResult<String> {
        let payload = LibrePayload {
            q: &request.q,
            source: &request.source,
            target: &request.target,
            format: request.format.as_str(),
            api_key: self.api_key.as_deref(),
        };

        debug!("POST {} ({} -> {})", self.endpoint, request.source, request.target);
        let body = post_json(&self.client, self.endpoint.clone(), &payload).await?;
        Self::extract_translation(&body)
    }

    fn provider_name(&self) -> &str {
        "LibreTranslate"
    }
}
