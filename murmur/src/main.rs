use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use murmur::api::{create_router, AppState};
use murmur::config::Config;
use murmur::db::{Database, DatabaseBackend, LibSqlBackend};
use murmur::llm::LlmProvider;
use murmur::wallet::WalletProvider;

#[derive(Parser)]
#[command(name = "murmur")]
#[command(about = "Voice-to-chain bridge for wearable transcription devices")]
struct Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "murmur=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if config.server.api_keys.is_empty() {
        tracing::warn!(
            "MURMUR_API_KEYS is not set — the dashboard read API is locked. Set MURMUR_API_KEYS to enable /api/v1/transactions and /api/v1/trades."
        );
    }

    tracing::info!("Initializing database...");
    let raw_db = Database::new(&config.database).await?;
    let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(raw_db));

    if let Some(llm_config) = &config.llm {
        tracing::info!("Initializing extraction model: {}...", llm_config.model);
    }
    let llm = LlmProvider::new(config.llm.as_ref());
    if !llm.is_available() {
        tracing::warn!("Extraction model unavailable - spoken commands cannot be processed");
    }

    tracing::info!("Initializing custody client: {}...", config.wallet.base_url);
    let wallet = WalletProvider::new(&config.wallet)?;

    let state = AppState::new(config.clone(), db, llm, wallet);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Murmur starting on http://{}", addr);
    tracing::info!("  Device webhook: http://{}/memory?uid=<device>", addr);
    tracing::info!("  Health check:   http://{}/api/v1/health", addr);
    tracing::info!("  OpenAPI spec:   http://{}/api/v1/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
