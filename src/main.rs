use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use devconnect_api::app::{cors_layer, router, AppState};
use devconnect_api::auth::TokenVerifier;
use devconnect_api::config::config;
use devconnect_api::database;
use devconnect_api::services::GithubClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("devconnect_api=info,tower_http=info")
        }))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config();
    tracing::info!("Starting DevConnect API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set; every credential will be rejected");
    }

    let store = database::connect(&config.storage)
        .await
        .context("failed to open storage")?;
    let verifier = TokenVerifier::from_config(&config.security);
    let github = GithubClient::new(&config.github).context("failed to build GitHub client")?;

    let mut app = router(AppState::new(store, verifier, github));
    if let Some(cors) = cors_layer(&config.security) {
        app = app.layer(cors);
    }
    if config.server.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("DevConnect API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
