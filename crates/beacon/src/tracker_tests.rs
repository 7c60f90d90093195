use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::page::Page;
use crate::state::{BeaconState, MemoryState};
use crate::tracker::{Tracker, TrackerConfig};

fn fast_config(uri: &str) -> TrackerConfig {
    let mut config = TrackerConfig::new(format!("{uri}/track-view"));
    config.retry_delay = Duration::from_millis(10);
    config
}

fn tracker(server: &MockServer) -> Tracker {
    Tracker::new(fast_config(&server.uri()), Arc::new(MemoryState::new())).unwrap()
}

fn tracker_with_state(server: &MockServer, state: Arc<MemoryState>) -> Tracker {
    Tracker::new(fast_config(&server.uri()), state).unwrap()
}

fn success_body(count: i64) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "viewCount": count,
        "message": "View tracked successfully"
    })
}

fn blog_page(page_path: &str) -> Page {
    Page {
        path: page_path.to_owned(),
        hostname: "example.com".to_owned(),
        ..Page::default()
    }
}

#[tokio::test]
async fn test_track_slug_success_on_first_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/track-view"))
        .and(body_partial_json(serde_json::json!({
            "slug": "first-post",
            "website": "example.com"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(5)))
        .expect(1)
        .mount(&server)
        .await;

    let tracker = tracker(&server);
    let resp = tracker.track_slug("first-post", "example.com").await.unwrap();
    assert!(resp.success);
    assert_eq!(resp.view_count, 5);
}

#[tokio::test]
async fn test_payload_carries_stored_client_identity() {
    let server = MockServer::start().await;
    let state = Arc::new(MemoryState::new());
    state.set_client_id("client_1700000000000_abcdef123");

    Mock::given(method("POST"))
        .and(path("/track-view"))
        .and(body_partial_json(serde_json::json!({
            "uniqueId": "client_1700000000000_abcdef123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(1)))
        .expect(1)
        .mount(&server)
        .await;

    let tracker = tracker_with_state(&server, state);
    tracker.track_slug("first-post", "example.com").await.unwrap();
}

#[tokio::test]
async fn test_retry_on_500_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/track-view"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(2)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/track-view"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let tracker = tracker(&server);
    let resp = tracker.track_slug("first-post", "example.com").await.unwrap();
    assert_eq!(resp.view_count, 2);
}

#[tokio::test]
async fn test_exactly_three_attempts_then_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/track-view"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(3)
        .mount(&server)
        .await;

    let tracker = tracker(&server);
    let err = tracker.track_slug("first-post", "example.com").await.unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("all retry attempts failed"));
    assert!(msg.contains("500"));
}

#[tokio::test]
async fn test_track_page_marks_slug_after_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/track-view"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(1)))
        .expect(1)
        .mount(&server)
        .await;

    let state = Arc::new(MemoryState::new());
    let tracker = tracker_with_state(&server, Arc::clone(&state));
    tracker.track_page(&blog_page("/blog/first-post")).await;
    assert!(state.was_tracked("first-post"));
}

#[tokio::test]
async fn test_track_page_dedups_within_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/track-view"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(1)))
        .expect(1)
        .mount(&server)
        .await;

    let tracker = tracker(&server);
    tracker.track_page(&blog_page("/blog/first-post")).await;
    tracker.track_page(&blog_page("/blog/first-post")).await;
}

#[tokio::test]
async fn test_track_slug_bypasses_the_dedup_set() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/track-view"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(1)))
        .expect(3)
        .mount(&server)
        .await;

    let state = Arc::new(MemoryState::new());
    let tracker = tracker_with_state(&server, Arc::clone(&state));
    tracker.track_page(&blog_page("/blog/first-post")).await;
    tracker.track_slug("first-post", "example.com").await.unwrap();
    tracker.track_slug("first-post", "example.com").await.unwrap();
}

#[tokio::test]
async fn test_track_page_without_slug_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let tracker = tracker(&server);
    tracker.track_page(&blog_page("/shop/items/42")).await;
}

#[tokio::test]
async fn test_track_page_disabled_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let tracker = tracker(&server);
    tracker.disable();
    tracker.track_page(&blog_page("/blog/first-post")).await;
}

#[tokio::test]
async fn test_track_page_loopback_host_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let tracker = tracker(&server);
    let mut page = blog_page("/blog/first-post");
    page.hostname = "localhost".to_owned();
    tracker.track_page(&page).await;
}

#[tokio::test]
async fn test_track_page_swallows_delivery_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/track-view"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(3)
        .mount(&server)
        .await;

    let state = Arc::new(MemoryState::new());
    let tracker = tracker_with_state(&server, Arc::clone(&state));
    tracker.track_page(&blog_page("/blog/first-post")).await;
    // Failure is logged only; the slug stays untracked so a later page
    // load can try again.
    assert!(!state.was_tracked("first-post"));
}
