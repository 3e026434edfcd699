use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chartbot_gateway::{backend::InferenceBackend, config::Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,chartbot_gateway=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;
    let addr = settings.bind_addr;
    let state = chartbot_gateway::build_state(settings)?;

    let connected = state.backend.check_availability().await;
    info!(connected, model = %state.settings.model, "model server status");

    let app = chartbot_gateway::build_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "chart bot listening");

    axum::serve(listener, app).await?;
    Ok(())
}
