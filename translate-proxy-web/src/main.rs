mod routes;

use clap::Parser;
use tracing::info;

use routes::{AppState, ErrorStatusPolicy, cors_layer, router};
use translate_proxy::{ProviderArgs, Translator};

/// HTTP front for the translation proxy
#[derive(Parser, Debug)]
#[command(name = "translate-proxy-web", version, about)]
struct ServerArgs {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Comma-separated CORS allow-list; all origins are allowed when unset
    #[arg(long = "allowed-origins", env = "ALLOWED_ORIGINS", value_delimiter = ',')]
    allowed_origins: Vec<String>,

    /// Whether failures keep HTTP 200 (in-body) or use 4xx/5xx (mapped)
    #[arg(long = "error-status", env = "TRANSLATE_ERROR_STATUS", value_enum, default_value_t = ErrorStatusPolicy::InBody)]
    error_status: ErrorStatusPolicy,

    #[command(flatten)]
    provider: ProviderArgs,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?),
        )
        .init();

    let args = ServerArgs::parse();

    // Resolve provider configuration once; any problem aborts startup
    let config = args
        .provider
        .with_env_fallbacks()
        .into_config()
        .map_err(|e| format!("Failed to initialize translator: {}", e))?;
    let translator = Translator::from_config(&config)?;
    let cors = cors_layer(&args.allowed_origins)?;

    info!(
        "🌍 Starting translate-proxy with {} ({}) at {} (timeout {:?})",
        translator.provider_name(),
        config.kind,
        config.endpoint,
        config.timeout
    );
    if args.error_status == ErrorStatusPolicy::InBody {
        info!("Errors are reported in the body with HTTP 200");
    }

    let state = AppState {
        translator,
        error_status: args.error_status,
    };
    let app = router(state, cors);

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port)).await?;
    info!("🚀 Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
