use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;

use wayfarer::Config;
use wayfarer::AdvisorService;
use wayfarer::handlers::{AppState, router};
use wayfarer::storage::MemoryStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wayfarer=info,tower_http=info".into()),
        )
        .init();

    // Load configuration
    let config = Config::load();

    if !config.openai.is_configured() {
        tracing::warn!(
            "OPENAI_API_KEY is not set - provider routes will fail until it is configured"
        );
    }

    // Conversation state and the recommendation cache live for the process
    // lifetime; both vanish on restart.
    let store = Arc::new(MemoryStore::new());
    let service = AdvisorService::new(&config, store);
    let app = router(Arc::new(AppState { service }));

    let bind: SocketAddr = config.server.bind.parse()?;
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(%bind, "Starting travel advisor server");

    axum::serve(listener, app).await?;
    Ok(())
}
