use std::sync::Arc;

use anyhow::Context;
use gemini_chat::{
    config::RelayConfig, routes, services::gemini::GeminiClient, state::AppState,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = RelayConfig::from_env()?;

    let generator = GeminiClient::with_base_url(&config.api_key, &config.api_base);
    let state = Arc::new(AppState::new(Arc::new(generator), &config.default_model));

    let app = routes::create_router().with_state(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;

    info!(port = config.port, model = %config.default_model, "Server running on port {}", config.port);
    axum::serve(listener, app).await?;
    Ok(())
}
