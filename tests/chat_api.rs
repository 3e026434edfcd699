use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chartbot_gateway::{
    backend::mock::MockBackend,
    build_app,
    config::{Language, Settings},
    state::AppState,
};
use serde_json::Value;
use tower::util::ServiceExt;

fn app_with(backend: MockBackend, language: Language) -> (Router, Arc<MockBackend>) {
    let backend = Arc::new(backend);
    let settings = Settings::default().with_language(language);
    let app = build_app(AppState::new(backend.clone(), settings));
    (app, backend)
}

async fn post_chat(app: Router, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header("content-type", "application/json")
                .body(Body::from(body.to_owned()))
                .expect("request build"),
        )
        .await
        .expect("request execution");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body should be readable");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn affirmative_request_returns_chart_descriptor() {
    let (app, backend) = app_with(
        MockBackend::named("chart-yes").with_reply("Yes, here is your line chart!"),
        Language::English,
    );

    let (status, body) =
        post_chat(app, r#"{"message":"line chart please: apple 10 banana 20"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Yes, here is your line chart!");
    let chart = &body["chart_data"];
    assert_eq!(chart["type"], "line");
    assert_eq!(chart["data"]["labels"], serde_json::json!(["apple", "banana"]));
    assert_eq!(chart["data"]["datasets"][0]["data"], serde_json::json!([10.0, 20.0]));
    assert_eq!(chart["options"]["responsive"], true);
    assert_eq!(chart["options"]["plugins"]["title"]["display"], true);
    assert_eq!(chart["options"]["plugins"]["title"]["text"], "Data Chart");
    assert_eq!(backend.generate_calls(), 1);
}

#[tokio::test]
async fn korean_request_extracts_month_labels() {
    let (app, _backend) = app_with(
        MockBackend::default().with_reply("예, 차트를 만들어드릴게요!"),
        Language::Korean,
    );

    let (status, body) = post_chat(app, r#"{"message":"1월 100 2월 200 파이 차트"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chart_data"]["type"], "pie");
    assert_eq!(body["chart_data"]["data"]["labels"], serde_json::json!(["1월", "2월"]));
    assert_eq!(body["chart_data"]["data"]["datasets"][0]["label"], "데이터");
}

#[tokio::test]
async fn offline_model_server_returns_advisory_without_chart() {
    let (app, backend) = app_with(MockBackend::offline(), Language::Korean);

    let (status, body) = post_chat(app, r#"{"message":"apple 10 banana 20"}"#).await;

    assert_eq!(status, StatusCode::OK);
    let text = body["response"].as_str().expect("response text");
    assert!(text.contains("'ollama serve'"));
    assert!(body["chart_data"].is_null());
    assert_eq!(backend.generate_calls(), 0);
}

#[tokio::test]
async fn affirmative_without_extractable_data_keeps_reply() {
    let (app, _backend) = app_with(
        MockBackend::default().with_reply("Sure, a chart coming up"),
        Language::English,
    );

    let (status, body) = post_chat(app, r#"{"message":"12, 34!!"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Sure, a chart coming up");
    assert!(body["chart_data"].is_null());
}

#[tokio::test]
async fn plain_conversation_has_no_chart() {
    let (app, backend) = app_with(
        MockBackend::default().with_default_reply("Hello there!"),
        Language::English,
    );

    let (status, body) = post_chat(app, r#"{"message":"hi"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Hello there!");
    assert!(body["chart_data"].is_null());
    assert_eq!(backend.generate_calls(), 1);
}

#[tokio::test]
async fn malformed_body_is_rejected_by_the_framework() {
    let (app, _backend) = app_with(MockBackend::default(), Language::English);

    let (status, _body) = post_chat(app, r#"{"text":"missing message field"}"#).await;

    assert!(status.is_client_error());
}

#[tokio::test]
async fn root_reports_connectivity_and_model() {
    let (app, _backend) = app_with(MockBackend::offline(), Language::English);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .expect("request build"),
        )
        .await
        .expect("request execution");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body should be readable");
    let body: Value = serde_json::from_slice(&bytes).expect("json body");
    assert_eq!(body["ollama_connected"], false);
    assert_eq!(body["model"], "llama3:latest");
    assert!(body["message"].as_str().is_some());
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let (app, _backend) = app_with(MockBackend::default(), Language::English);

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/chat")
                .header("origin", "http://localhost:3000")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .expect("request build"),
        )
        .await
        .expect("request execution");

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn handler_failure_still_answers_with_localized_text() {
    let (app, backend) = app_with(MockBackend::panicking(), Language::Korean);

    let (status, body) = post_chat(app, r#"{"message":"apple 10 banana 20"}"#).await;

    assert_eq!(status, StatusCode::OK);
    let text = body["response"].as_str().expect("response text");
    assert!(text.starts_with("오류가 발생했습니다: "), "got: {text}");
    assert!(body["chart_data"].is_null());
    assert_eq!(backend.generate_calls(), 1);
}
