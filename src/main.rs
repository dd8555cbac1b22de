use product_api::infrastructure::{database::DatabaseManager, logger::Logger};
use product_api::{create_router, AppState, Config, MySqlProductStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    Logger::init(&config.logging);

    info!("Starting product API server...");

    let db = DatabaseManager::new(&config.database).map_err(|e| {
        error!("Failed to configure database pool: {}", e);
        e
    })?;

    let store = MySqlProductStore::new(db.get_pool().clone(), config.database.query_timeout());
    let state = AppState::new(Arc::new(store));
    let app = create_router(
        state,
        &config.http.base_path,
        config.http.request_timeout(),
    );

    let addr = config.http.socket_addr()?;
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind {}: {}", addr, e);
        e
    })?;

    info!("🚀 Product API running on http://{}", listener.local_addr()?);
    info!("   Base path: {}", config.http.base_path);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received");
}
