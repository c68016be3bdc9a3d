use anyhow::Context;
use linkedin_api::app::{self, AppState};
use linkedin_api::config::AppConfig;
use linkedin_api::db::repository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkedin_api=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting linkedin-api server...");

    let config = AppConfig::from_env()?;

    // Connect to MongoDB; an unreachable store is fatal
    let mongo_db = match repository::connect(&config).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Error connecting to MongoDB: {e}");
            return Err(e).context("Failed to connect to MongoDB");
        }
    };

    tracing::info!(
        "Connected to MongoDB at {} (database '{}')",
        config.mongodb_uri,
        config.database
    );

    let app = app::router(AppState::from_database(&mongo_db));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
