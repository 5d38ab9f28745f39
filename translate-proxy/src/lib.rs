//! Translation proxy core
//!
//! Accepts a `{q, source, target, format}` request, forwards it to one
//! configured upstream (Google Translate v2 or a LibreTranslate/Argos
//! server) and normalizes the answer to `{translatedText}` or
//! `{error, details}`.
//!
//! # Workflow Example
//!
//! ```ignore
//! use clap::Parser;
//! use translate_proxy::{ProviderArgs, TranslatePayload, Translator};
//!
//! #[derive(Parser)]
//! struct Cli {
//!     #[command(flatten)]
//!     provider: ProviderArgs,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Resolve configuration once, failing fast when it is incomplete
//!     let config = Cli::parse().provider.with_env_fallbacks().into_config()?;
//!
//!     // 2. Build the endpoint around the configured adapter
//!     let translator = Translator::from_config(&config)?;
//!
//!     // 3. Translate; errors come back inside the result
//!     let result = translator.translate(TranslatePayload::new("hello", "en", "es")).await;
//!     println!("{}", serde_json::to_string(&result)?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod google;
pub mod libre;
pub mod mock;
pub mod provider;
pub mod request;
pub mod result;
pub mod translator;

// Re-export main types for convenient access
pub use config::{ProviderArgs, ProviderConfig, ProviderKind};
pub use error::{ProxyResult, TranslateError};
pub use google::GoogleTranslateProvider;
pub use libre::LibreTranslateProvider;
pub use mock::{MockMode, MockProvider};
pub use provider::{TranslationProvider, build_provider};
pub use request::{TextFormat, TranslatePayload, TranslationRequest};
pub use result::TranslationResult;
pub use translator::Translator;
