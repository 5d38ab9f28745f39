//! The translation endpoint core
//!
//! [`Translator`] validates a payload, makes exactly one bounded call to the
//! configured provider and folds every outcome into a [`TranslationResult`].
//! It never returns an error and never panics on upstream input; HTTP
//! concerns live in the web crate.

use crate::config::ProviderConfig;
use crate::error::{ProxyResult, TranslateError};
use crate::provider::{TranslationProvider, build_provider};
use crate::request::TranslatePayload;
use crate::result::TranslationResult;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Shared, immutable handle that serves translation requests
#[derive(Clone)]
pub struct Translator {
    provider: Arc<dyn TranslationProvider>,
    timeout: Duration,
}

impl Translator {
    pub fn new(provider: Arc<dyn TranslationProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Build the provider described by `config` and wrap it
    pub fn from_config(config: &ProviderConfig) -> ProxyResult<Self> {
        Ok(Self::new(build_provider(config)?, config.timeout))
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Translate a client payload into a normalized result
    pub async fn translate(&self, payload: TranslatePayload) -> TranslationResult {
        match self.try_translate(payload).await {
            Ok(text) => TranslationResult::success(text),
            Err(err) => {
                warn!("Translation failed ({}): {}", err.kind(), err);
                TranslationResult::from(&err)
            }
        }
    }

    /// Same as [`Translator::translate`] but keeps the typed error
    ///
    /// The web layer uses this to pick an HTTP status before normalizing.
    pub async fn try_translate(&self, payload: TranslatePayload) -> ProxyResult<String> {
        let request = payload.validate()?;

        info!(
            "Translating {} chars {} → {} ({}) via {}",
            request.q.chars().count(),
            request.source,
            request.target,
            request.format,
            self.provider.provider_name()
        );

        let translated = tokio::time::timeout(self.timeout, self.provider.translate(&request))
            .await
            .map_err(|_| TranslateError::timeout(self.timeout))??;

        info!("Translated into {} ({} chars)", request.target, translated.chars().count());
        Ok(translated)
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("provider", &self.provider.provider_name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
