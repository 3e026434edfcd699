pub mod backend;
pub mod chart;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod locale;
pub mod metrics;
pub mod models;
pub mod orchestrator;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use backend::ollama::OllamaClient;
use config::Settings;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub fn build_state(settings: Settings) -> Result<state::AppState, std::io::Error> {
    let client = OllamaClient::new(&settings).map_err(std::io::Error::other)?;
    info!(
        host = %settings.ollama_host,
        model = %settings.model,
        language = ?settings.language,
        "inference client configured"
    );
    Ok(state::AppState::new(Arc::new(client), settings))
}

pub fn build_app(state: state::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/chat", post(handlers::chat))
        .route("/healthz", get(handlers::healthz))
        .route("/metrics", get(handlers::metrics))
        .layer(cors)
        .with_state(state)
}
