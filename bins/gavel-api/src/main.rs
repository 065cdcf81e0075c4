mod handlers;
mod judge;
mod review;
mod routes;

use axum::Router;
use gavel_common::config::Config;
use redis::aio::ConnectionManager;
use review::ReviewClient;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub redis: ConnectionManager,
    pub config: Config,
    /// Text-completion collaborator, constructed once at startup from the
    /// environment key and injected here - never reached for ambiently.
    pub review: Option<ReviewClient>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Gavel API booting...");

    let config = Config::from_env();

    // Connect to Redis
    let client = redis::Client::open(config.redis_url.as_str())
        .expect("Failed to create Redis client");

    let redis_conn = ConnectionManager::new(client)
        .await
        .expect("Failed to connect to Redis");

    info!("Connected to Redis: {}", config.redis_url);

    let review = config
        .gemini_api_key
        .clone()
        .map(|key| ReviewClient::new(key, config.gemini_model.clone()));
    if review.is_none() {
        warn!("GEMINI_API_KEY is not set; /ai-review is disabled");
    }

    let state = Arc::new(AppState {
        redis: redis_conn,
        config: config.clone(),
        review,
    });

    // Build router
    let app = Router::new().merge(routes::routes()).with_state(state);

    // Start server
    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    info!("HTTP server listening on {}", config.bind_addr);
    info!("Ready to judge submissions");

    axum::serve(listener, app).await.expect("Server error");
}
