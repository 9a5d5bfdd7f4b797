use magic_villa::core::{AppState, Config};
use magic_villa::{create_router, store};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging: RUST_LOG se presente, altrimenti info
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Inizializza la configurazione
    let config = Config::from_env()?;
    config.print_info();

    // Pool + migrations (schema e ville iniziali)
    let pool = store::connect(&config).await?;
    let state = Arc::new(AppState::new(pool));

    // Crea il router
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Crea il listener TCP
    let address = config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Server listening on http://{}", address);

    // Avvia il server
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        // senza segnale il server resta attivo
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
