//! Provider configuration, resolved once at startup
//!
//! Binaries parse [`ProviderArgs`] (flags or environment variables), then
//! call [`ProviderArgs::into_config`] to obtain a validated
//! [`ProviderConfig`]. Any problem here is a
//! [`TranslateError::Configuration`] and should abort the process before it
//! starts serving.

use crate::error::{ProxyResult, TranslateError};
use reqwest::Url;
use std::fmt;
use std::time::Duration;

/// Google Translate v2 endpoint used when no upstream URL is configured
pub const GOOGLE_TRANSLATE_URL: &str = "https://translation.googleapis.com/language/translate/v2";

/// Default bound on a single upstream call
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Largest timeout accepted from configuration
pub const MAX_TIMEOUT_MS: u64 = 60_000;

/// Which upstream API shape to speak
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProviderKind {
    /// Google Translate v2, key in the query string
    Google,
    /// LibreTranslate or an Argos-compatible server
    #[value(name = "libretranslate", aliases = ["libre", "argos"])]
    LibreTranslate,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Google => "google",
            ProviderKind::LibreTranslate => "libretranslate",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command-line and environment options that select the upstream provider
#[derive(Debug, Clone, clap::Args)]
pub struct ProviderArgs {
    /// Upstream provider API
    #[arg(long, env = "TRANSLATE_PROVIDER", value_enum, default_value_t = ProviderKind::Google)]
    pub provider: ProviderKind,

    /// Full URL of the upstream translate endpoint
    #[arg(long = "upstream-url", env = "TRANSLATE_API_URL")]
    pub upstream_url: Option<String>,

    /// API key for the upstream (falls back to GOOGLE_API_KEY)
    #[arg(long = "api-key", env = "TRANSLATE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Timeout for a single upstream call, in milliseconds
    #[arg(long = "timeout-ms", env = "TRANSLATE_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,
}

impl ProviderArgs {
    /// Fill the API key from `GOOGLE_API_KEY` when `TRANSLATE_API_KEY` is unset
    pub fn with_env_fallbacks(mut self) -> Self {
        if self.api_key.is_none() {
            self.api_key = std::env::var("GOOGLE_API_KEY").ok();
        }
        self
    }

    /// The configured timeout, checked against the accepted range
    pub fn timeout(&self) -> ProxyResult<Duration> {
        validate_timeout(Duration::from_millis(self.timeout_ms))
    }

    pub fn into_config(self) -> ProxyResult<ProviderConfig> {
        let timeout = self.timeout()?;
        ProviderConfig::new(self.provider, self.upstream_url.as_deref(), self.api_key, timeout)
    }
}

/// Accept timeouts between 1 ms and [`MAX_TIMEOUT_MS`]
pub fn validate_timeout(timeout: Duration) -> ProxyResult<Duration> {
    if timeout.is_zero() || timeout > Duration::from_millis(MAX_TIMEOUT_MS) {
        return Err(TranslateError::Configuration(format!(
            "timeout must be between 1 and {} ms, got {} ms",
            MAX_TIMEOUT_MS,
            timeout.as_millis()
        )));
    }
    Ok(timeout)
}

/// Validated, read-only provider settings
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub endpoint: Url,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Validate and build a provider configuration
    ///
    /// # Arguments
    ///
    /// * `kind` - Upstream API shape
    /// * `upstream_url` - Endpoint URL; optional for Google, required for LibreTranslate
    /// * `api_key` - Required for Google, optional for LibreTranslate
    /// * `timeout` - Bound on each upstream call, between 1 ms and [`MAX_TIMEOUT_MS`]
    pub fn new(
        kind: ProviderKind,
        upstream_url: Option<&str>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> ProxyResult<Self> {
        let timeout = validate_timeout(timeout)?;

        let api_key = api_key.filter(|k| !k.trim().is_empty());

        let upstream_url = upstream_url.map(str::trim).filter(|u| !u.is_empty());
        let raw_url = match (kind, upstream_url) {
            (_, Some(url)) => url,
            (ProviderKind::Google, None) => GOOGLE_TRANSLATE_URL,
            (ProviderKind::LibreTranslate, None) => {
                return Err(TranslateError::Configuration(
                    "TRANSLATE_API_URL must be set for the libretranslate provider".to_string(),
                ));
            }
        };

        let endpoint = Url::parse(raw_url).map_err(|e| {
            TranslateError::Configuration(format!("invalid upstream URL {:?}: {}", raw_url, e))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(TranslateError::Configuration(format!(
                "upstream URL must use http or https: {}",
                raw_url
            )));
        }

        if kind == ProviderKind::Google && api_key.is_none() {
            return Err(TranslateError::Configuration(
                "an API key is required for the google provider \
                 (set TRANSLATE_API_KEY or GOOGLE_API_KEY)"
                    .to_string(),
            ));
        }

        Ok(Self {
            kind,
            endpoint,
            api_key,
            timeout,
        })
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish()
    }
}
