//! Router tests with in-memory providers; no sockets involved.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use drive_gallery::services::drive::mock::{MockContentSource, MockFile};
use drive_gallery::services::providers::mock::MockInferenceProvider;
use drive_gallery::startup::{build_router, AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

struct Harness {
    router: Router,
    content: Arc<MockContentSource>,
    inference: Arc<MockInferenceProvider>,
}

fn harness(inference: MockInferenceProvider) -> Harness {
    let content = Arc::new(MockContentSource::new());
    content.insert(
        "F1",
        MockFile::new("a", "a.png", "image/png")
            .with_thumbnail("https://thumbs/a")
            .with_chunks([&b"b1"[..], &b"b2"[..], &b"b3"[..]]),
    );
    content.insert(
        "F1",
        MockFile::new("b", "b.pdf", "application/pdf").with_chunks([&b"%PDF"[..]]),
    );
    content.insert(
        "F1",
        MockFile::new("torn", "torn.png", "image/png")
            .with_thumbnail("https://thumbs/torn")
            .with_chunks([&b"half"[..], &b"rest"[..]])
            .failing_after(1),
    );
    content.fail_listing("denied");

    let inference = Arc::new(inference);
    let state = AppState::new(content.clone(), inference.clone(), "F1");
    Harness {
        router: build_router(state, "static"),
        content,
        inference,
    }
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn thumbnails_filter_non_images() {
    let h = harness(MockInferenceProvider::new(true));

    let (status, body) = get(&h.router, "/thumbnails/F1").await;

    assert_eq!(status, StatusCode::OK);
    let entries: Value = serde_json::from_slice(&body).unwrap();
    let ids: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["a", "torn"]);
}

#[tokio::test]
async fn listing_failure_maps_to_500() {
    let h = harness(MockInferenceProvider::new(true));

    let (status, body) = get(&h.router, "/thumbnails/denied").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!String::from_utf8_lossy(&body).contains("quota"));
}

#[tokio::test]
async fn transcribe_returns_provider_text() {
    let h = harness(MockInferenceProvider::new(true).with_reply("Dear diary"));

    let (status, body) = get(&h.router, "/transcribe/a").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["transcription"], "Dear diary");
    assert_eq!(h.inference.call_count(), 1);
}

#[tokio::test]
async fn transcribe_non_image_is_bad_request() {
    let h = harness(MockInferenceProvider::new(true));

    let (status, body) = get(&h.router, "/transcribe/b").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].is_string());
    assert_eq!(h.content.streams_opened(), 0);
}

#[tokio::test]
async fn transcribe_torn_stream_is_500_without_inference() {
    let h = harness(MockInferenceProvider::new(true));

    let (status, _) = get(&h.router, "/transcribe/torn").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(h.inference.call_count(), 0);
}

#[tokio::test]
async fn transcribe_inference_failure_is_500() {
    let h = harness(MockInferenceProvider::new(false));

    let (status, _) = get(&h.router, "/transcribe/a").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn root_uses_configured_folder() {
    let h = harness(MockInferenceProvider::new(true));

    let (status, body) = get(&h.router, "/").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 3);
    assert_eq!(json[0], serde_json::json!({"id": "a", "name": "a.png"}));
}

#[tokio::test]
async fn file_route_streams_content() {
    let h = harness(MockInferenceProvider::new(true));

    let (status, body) = get(&h.router, "/file/a").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"b1b2b3");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let h = harness(MockInferenceProvider::new(true));

    let response = h
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/thumbnails/F1")
                .header("origin", "http://gallery.local")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}
