mod common;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use common::test_config;
use prompt_image_service::{ImageBackend, UpstreamClient, build_router, error::ServiceError};

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
}

/// Serves a fake chat-completions endpoint answering with `status` and `reply`.
async fn fake_upstream(status: StatusCode, reply: Value) -> (String, Captured) {
    let captured = Captured::default();
    let app = Router::new()
        .route(
            "/chat/completions",
            post(
                move |State(captured): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| {
                    let reply = reply.clone();
                    async move {
                        captured.requests.lock().push((headers, body));
                        (status, Json(reply))
                    }
                },
            ),
        )
        .with_state(captured.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/chat/completions"), captured)
}

#[tokio::test]
async fn sends_model_message_and_fixed_headers() {
    let (endpoint, captured) = fake_upstream(
        StatusCode::OK,
        json!({"choices": [{"message": {"content": "https://x/y.png"}}]}),
    )
    .await;
    let config = test_config(&endpoint);
    let client = UpstreamClient::new(&config.upstream).unwrap();

    let reply = client.request_image("a fox, sketch").await.unwrap();
    assert!(reply.is_success());
    assert_eq!(
        reply.body.unwrap()["choices"][0]["message"]["content"],
        "https://x/y.png"
    );

    let requests = captured.requests.lock();
    assert_eq!(requests.len(), 1);
    let (headers, body) = &requests[0];
    assert_eq!(headers["customerid"], "cus_test");
    assert_eq!(headers["authorization"], "Bearer token-123");
    assert_eq!(headers["content-type"], "application/json");
    assert_eq!(
        body,
        &json!({
            "model": "test/flux",
            "messages": [{"role": "user", "content": "a fox, sketch"}]
        })
    );
}

#[tokio::test]
async fn error_status_is_returned_without_body() {
    let (endpoint, _captured) =
        fake_upstream(StatusCode::TOO_MANY_REQUESTS, json!({"detail": "slow down"})).await;
    let client = UpstreamClient::new(&test_config(&endpoint).upstream).unwrap();

    let reply = client.request_image("anything").await.unwrap();
    assert_eq!(reply.status, 429);
    assert!(!reply.is_success());
    assert!(reply.body.is_none());
}

#[tokio::test]
async fn unreachable_upstream_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = test_config(&format!("http://{addr}/chat/completions"));
    let client = UpstreamClient::new(&config.upstream).unwrap();

    let err = client.request_image("anything").await.unwrap_err();
    assert!(matches!(err, ServiceError::Transport(_)));
}

#[test]
fn invalid_header_values_are_rejected() {
    let mut config = test_config("http://127.0.0.1:1/chat/completions");
    config.upstream.api_token = "line\nbreak".to_string();

    assert!(matches!(
        UpstreamClient::new(&config.upstream),
        Err(ServiceError::Config(_))
    ));
}

#[tokio::test]
async fn endpoint_relays_upstream_status_end_to_end() {
    let (endpoint, _captured) =
        fake_upstream(StatusCode::BAD_GATEWAY, json!({"secret": "internal detail"})).await;
    let config = Arc::new(test_config(&endpoint));
    let client = Arc::new(UpstreamClient::new(&config.upstream).unwrap());
    let app = build_router(config, client);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/generate"))
        .json(&json!({"prompt": "tree"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"success": false, "error": "AI service error: 502"})
    );
}
