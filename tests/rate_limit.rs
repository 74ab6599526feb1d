use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use awal_gpt::backend::{ new_client, BackendConfig };
use awal_gpt::chat::store::SessionStore;
use awal_gpt::config::site::embedded_site_content;
use awal_gpt::config::SiteContentStore;
use awal_gpt::server::{ build_router, AppState };

use axum::body::Body;
use axum::http::{ header, Request, StatusCode };
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{ json, Value as JsonValue };
use tower::ServiceExt;
use wiremock::matchers::{ method, path };
use wiremock::{ Mock, MockServer, ResponseTemplate };

// The chat limiter is process-wide, so this burst lives in its own test binary.

fn app(backend: &MockServer) -> Router {
    let client = new_client(
        &(BackendConfig {
            base_url: backend.uri(),
            timeout: Duration::from_secs(5),
            user_id: None,
        })
    ).unwrap();
    let content = SiteContentStore::new(
        PathBuf::from("does-not-exist.json"),
        embedded_site_content().unwrap(),
        None
    );
    build_router(
        AppState {
            client,
            sessions: Arc::new(SessionStore::default()),
            content: Arc::new(content),
        },
        "public"
    )
}

fn post_json(uri: &str, body: JsonValue) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn message_burst_is_throttled() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&backend).await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "response": { "text": "Azul" } }))
                .set_delay(Duration::from_millis(500))
        )
        .mount(&backend).await;
    let app = app(&backend);

    // One session per message so no send is refused as pending.
    let mut uris = Vec::new();
    for _ in 0..20 {
        let response = app.clone().oneshot(post_json("/api/sessions", json!({}))).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let snapshot: JsonValue = serde_json::from_slice(&body).unwrap();
        uris.push(format!("/api/sessions/{}/messages", snapshot["id"].as_str().unwrap()));
    }

    let handles: Vec<_> = uris
        .into_iter()
        .map(|uri| {
            let app = app.clone();
            tokio::spawn(async move {
                app.oneshot(post_json(&uri, json!({ "message": "azul" }))).await.unwrap().status()
            })
        })
        .collect();

    let mut accepted = 0;
    let mut throttled = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => {
                accepted += 1;
            }
            StatusCode::TOO_MANY_REQUESTS => {
                throttled += 1;
            }
            other => panic!("unexpected status {}", other),
        }
    }
    assert!(accepted >= 10, "only {} sends accepted", accepted);
    assert!(throttled >= 1, "burst of 20 was never throttled");
}
