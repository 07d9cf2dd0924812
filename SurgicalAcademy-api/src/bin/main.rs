use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use surgical_academy_api::api::{create_app, AppState};
use surgical_academy_api::config::AppConfig;
use surgical_academy_domain::auth::Passwords;
use surgical_academy_domain::completion::OpenAiCompatibleClient;
use surgical_academy_domain::database::DatabasePool;

/// How often expired revocations are dropped
const REVOCATION_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// The main entry point for the SurgicalAcademy API server
///
/// Loads configuration, opens and migrates the database, optionally seeds it,
/// then serves the router until Ctrl+C or SIGTERM.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    if dotenv().is_err() {
        eprintln!("Warning: .env file not found or couldn't be read. Using environment variables.");
    }

    init_tracing();

    info!("🚀 Starting SurgicalAcademy API server");

    let config = AppConfig::from_env().context("invalid configuration")?;

    let pool = DatabasePool::open(&config.database).context("failed to open database")?;
    info!("Using {}", pool.connection_info());

    let passwords = Passwords::new();
    if config.seed_on_start {
        surgical_academy_domain::seed::seed(&pool, &passwords)
            .await
            .context("failed to seed database")?;
    }

    if config.completion.api_key.is_none() {
        warn!("AI_API_KEY is not set; AI search requests will be rejected upstream");
    }
    let completion = OpenAiCompatibleClient::new(config.completion.clone()).context("failed to build AI client")?;

    let state = AppState::new(
        pool,
        config.tokens.clone(),
        passwords,
        Arc::new(completion),
        config.environment.clone(),
    );
    let cleanup = state.gate.revocations().spawn_cleanup_task(REVOCATION_CLEANUP_INTERVAL);

    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    // Serve the application with graceful shutdown support
    if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    cleanup.abort();
    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_ansi(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stdout),
        )
        .with(env_filter)
        .init();
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down server...");
}
