//! Mock provider for testing
//!
//! A deterministic, network-free [`TranslationProvider`] used by the test
//! suites and by `translate-cli --mock`.
//!
//! # Example
//!
//! ```ignore
//! use translate_proxy::{MockMode, MockProvider, TranslatePayload, TranslationProvider};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockProvider::new(MockMode::Suffix);
//!     let request = TranslatePayload::new("hello", "en", "fr").validate().unwrap();
//!     assert_eq!(mock.translate(&request).await.unwrap(), "hello_fr");
//! }
//! ```

use crate::error::{ProxyResult, TranslateError};
use crate::provider::TranslationProvider;
use crate::request::TranslationRequest;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append target suffix: "hello" → "hello_fr"
    Suffix,

    /// Use predefined mappings, keyed by (text, target).
    /// Unknown pairs fall back to `Suffix`.
    Mappings(HashMap<(String, String), String>),

    /// Fail every call with the given error
    Error(TranslateError),

    /// No-op: return input unchanged
    NoOp,
}

/// Mock provider that simulates upstream behavior
///
/// Clones share the call counter, so a test can hand one clone to a
/// [`Translator`](crate::translator::Translator) and inspect the other.
#[derive(Debug, Clone)]
pub struct MockProvider {
    mode: MockMode,
    /// Simulated upstream latency
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl MockProvider {
    pub fn new(mode: MockMode) -> Self {
        Self::with_delay(mode, Duration::ZERO)
    }

    /// Create a MockProvider that waits `delay` before answering
    pub fn with_delay(mode: MockMode, delay: Duration) -> Self {
        Self {
            mode,
            delay,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `translate` calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn apply_translation(&self, request: &TranslationRequest) -> ProxyResult<String> {
        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", request.q, request.target)),
            MockMode::Mappings(map) => {
                let key = (request.q.clone(), request.target.clone());
                Ok(map
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| format!("{}_{}", request.q, request.target)))
            }
            MockMode::Error(err) => Err(err.clone()),
            MockMode::NoOp => Ok(request.q.clone()),
        }
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    async fn translate(&self, request: &TranslationRequest) -> ProxyResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.apply_translation(request)
    }

    fn provider_name(&self) -> &str {
        "Mock Provider"
    }
}
