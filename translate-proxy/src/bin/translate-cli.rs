use clap::Parser;
use std::sync::Arc;
use translate_proxy::{
    MockMode, MockProvider, ProviderArgs, TranslatePayload, TranslationResult, Translator,
};

/// One-shot translation through the configured upstream
#[derive(Parser)]
#[command(name = "translate-cli", version, about = "Translate a single text via the proxy core")]
struct Cli {
    /// Text to translate
    text: String,

    /// Target language code (e.g., es, fr, de)
    target: String,

    /// Source language code
    #[arg(long, short = 's', default_value = "en")]
    source: String,

    /// Payload format: text or html
    #[arg(long, short = 'f', default_value = "text")]
    format: String,

    /// Use the mock provider instead of a real upstream
    #[arg(long, short = 'm')]
    mock: bool,

    /// Show the resolved provider and request
    #[arg(long, short = 'v')]
    verbose: bool,

    #[command(flatten)]
    provider: ProviderArgs,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.parse()?))
        .init();

    let translator = if cli.mock {
        Translator::new(
            Arc::new(MockProvider::new(MockMode::Suffix)),
            cli.provider.timeout()?,
        )
    } else {
        let config = cli.provider.with_env_fallbacks().into_config()?;
        if cli.verbose {
            eprintln!("🔧 {:?}", config);
        }
        Translator::from_config(&config)?
    };

    if cli.verbose {
        eprintln!("📝 Source: \"{}\"", cli.text);
        eprintln!("🌍 {} → {} via {}", cli.source, cli.target, translator.provider_name());
    }

    let payload = TranslatePayload::new(&cli.text, &cli.source, &cli.target).with_format(&cli.format);
    let result = translator.translate(payload).await;

    println!("{}", serde_json::to_string_pretty(&result)?);

    match result {
        TranslationResult::Success { .. } => Ok(()),
        TranslationResult::Failure { error, .. } => Err(error.into()),
    }
}
