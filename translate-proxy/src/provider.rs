//! Translation provider trait and shared upstream plumbing
//!
//! The `TranslationProvider` trait is the seam between the endpoint and the
//! upstream APIs. Each adapter knows one upstream's request payload, auth
//! placement and response shape; the endpoint only ever sees a translated
//! string or a [`TranslateError`].
//!
//! # Example
//!
//! ```ignore
//! use translate_proxy::{TranslatePayload, build_provider};
//!
//! let provider = build_provider(&config)?;
//! let request = TranslatePayload::new("hello", "en", "es").validate()?;
//! let text = provider.translate(&request).await?;
//! ```

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::{ProxyResult, TranslateError};
use crate::google::GoogleTranslateProvider;
use crate::libre::LibreTranslateProvider;
use crate::request::TranslationRequest;
use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Generic trait for upstream translation providers
///
/// Implementations issue at most one outbound call per `translate` and never
/// retry.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Translate a validated request
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The translated text
    /// * `Err(TranslateError)` - Transport failure, non-2xx status, or an unreadable body
    async fn translate(&self, request: &TranslationRequest) -> ProxyResult<String>;

    /// Name of this provider, used in logs
    fn provider_name(&self) -> &str;
}

/// Largest upstream body kept in memory; anything beyond is dropped
pub const MAX_UPSTREAM_BODY_BYTES: usize = 1024 * 1024;

/// Build the adapter selected by the configuration
pub fn build_provider(config: &ProviderConfig) -> ProxyResult<Arc<dyn TranslationProvider>> {
    let provider: Arc<dyn TranslationProvider> = match config.kind {
        ProviderKind::Google => {
            let api_key = config.api_key.clone().ok_or_else(|| {
                TranslateError::Configuration("google provider needs an API key".to_string())
            })?;
            Arc::new(GoogleTranslateProvider::new(
                api_key,
                config.endpoint.clone(),
                config.timeout,
            )?)
        }
        ProviderKind::LibreTranslate => Arc::new(LibreTranslateProvider::new(
            config.endpoint.clone(),
            config.api_key.clone(),
            config.timeout,
        )?),
    };
    Ok(provider)
}

/// HTTP client with the per-call timeout applied
pub(crate) fn http_client(timeout: Duration) -> ProxyResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| TranslateError::Configuration(format!("Failed to create HTTP client: {}", e)))
}

/// POST a JSON body and return the raw body of a 2xx answer
///
/// Non-2xx answers become `UpstreamError` with the body preserved; transport
/// failures and timeouts become `UpstreamUnavailable`. Bodies are read up to
/// [`MAX_UPSTREAM_BODY_BYTES`]; a longer 2xx body is an
/// `UpstreamContractViolation` carrying the truncated text.
pub(crate) async fn post_json<B: Serialize + ?Sized>(
    client: &reqwest::Client,
    url: Url,
    body: &B,
) -> ProxyResult<String> {
    let response = client.post(url).json(body).send().await?;

    let status = response.status();
    let (text, truncated) = read_capped(response, MAX_UPSTREAM_BODY_BYTES).await?;

    if !status.is_success() {
        return Err(TranslateError::UpstreamError {
            status: status.as_u16(),
            body: text,
        });
    }

    if truncated {
        return Err(TranslateError::UpstreamContractViolation {
            reason: format!("response body exceeds {} bytes", MAX_UPSTREAM_BODY_BYTES),
            body: text,
        });
    }

    Ok(text)
}

/// Read at most `limit` bytes of the body, reporting whether more was sent
async fn read_capped(
    mut response: reqwest::Response,
    limit: usize,
) -> ProxyResult<(String, bool)> {
    let mut buf: Vec<u8> = Vec::new();
    let mut truncated = false;

    while let Some(chunk) = response.chunk().await? {
        let room = limit - buf.len();
        if chunk.len() > room {
            buf.extend_from_slice(&chunk[..room]);
            truncated = true;
            break;
        }
        buf.extend_from_slice(&chunk);
    }

    Ok((String::from_utf8_lossy(&buf).into_owned(), truncated))
}

/// Parse a 2xx body as JSON, keeping the raw text on failure
pub(crate) fn parse_body(body: &str) -> ProxyResult<serde_json::Value> {
    serde_json::from_str(body).map_err(|e| TranslateError::UpstreamContractViolation {
        reason: format!("body is not valid JSON: {}", e),
        body: body.to_string(),
    })
}
