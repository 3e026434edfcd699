use std::time::Instant;

use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::{
    chart::{extract_chart_data, generate_chart_config},
    errors::AppError,
    metrics::ChartOutcome,
    models::{ChatMessage, ChatResponse, StatusBanner},
    state::AppState,
};

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(body) => (
            [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(error) => AppError::Internal(format!("metrics render failed: {error}")).into_response(),
    }
}

pub async fn root(State(state): State<AppState>) -> Json<StatusBanner> {
    let ollama_connected = state.backend.check_availability().await;
    Json(StatusBanner {
        message: state.settings.language.strings().banner.to_owned(),
        ollama_connected,
        model: state.settings.model.clone(),
    })
}

/// Always answers with 200: failures become response text, not status codes.
pub async fn chat(State(state): State<AppState>, Json(message): Json<ChatMessage>) -> Response {
    let started = Instant::now();
    let _inflight = state.metrics.inflight_guard();
    let language = state.settings.language;
    let span = info_span!("chat", request_id = %Uuid::new_v4());

    let task_state = state.clone();
    let outcome = tokio::spawn(process_chat(task_state, message).instrument(span))
        .await
        .map_err(AppError::from);

    let payload = match outcome {
        Ok(payload) => payload,
        Err(error) => {
            warn!(error = %error, "chat handler failed");
            ChatResponse::text(language.handler_failure(&error.to_string()))
        }
    };

    let response = Json(payload).into_response();
    state.metrics.observe_request(
        "/chat",
        "POST",
        response.status().as_u16(),
        started.elapsed(),
    );
    response
}

async fn process_chat(state: AppState, message: ChatMessage) -> ChatResponse {
    let language = state.settings.language;

    if !state.backend.check_availability().await {
        state.metrics.observe_backend_error("unreachable");
        state.metrics.observe_chart(ChartOutcome::NotRequested);
        return ChatResponse::text(language.strings().not_connected);
    }

    let analysis = state.orchestrator.analyze(&message.message).await;
    if let Some(kind) = analysis.failure {
        state.metrics.observe_backend_error(kind);
    }

    let Some(request) = analysis.chart else {
        state.metrics.observe_chart(ChartOutcome::NotRequested);
        return ChatResponse::text(analysis.response);
    };

    let Some(data) = extract_chart_data(&message.message, language) else {
        info!(kind = request.kind.as_str(), "chart requested but no data extracted");
        state.metrics.observe_chart(ChartOutcome::NoData);
        return ChatResponse::text(analysis.response);
    };

    info!(
        kind = request.kind.as_str(),
        categories = data.labels.len(),
        "chart rendered"
    );
    state.metrics.observe_chart(ChartOutcome::Rendered);
    ChatResponse {
        response: analysis.response,
        chart_data: Some(generate_chart_config(
            request.kind,
            data,
            Some(&request.config),
            language,
        )),
    }
}
