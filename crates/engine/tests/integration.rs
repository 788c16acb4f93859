//! End-to-end tests: HTTP roster source → cycle → HTTP notification sink,
//! against an in-process mock of both APIs.
//!
//! ```bash
//! cargo test -p beastpush-engine --test integration
//! ```

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::mpsc;

use beastpush_common::config::AppConfig;
use beastpush_engine::catalog::{FixedSelector, MessageCatalog};
use beastpush_engine::{CycleError, CycleRunner, CycleSettings, NotificationCycle, Scheduler};
use beastpush_notifier::HttpNotificationSink;
use beastpush_roster::HttpRosterSource;

// ============================================================
// Mock APIs
// ============================================================

#[derive(Clone)]
struct MockApi {
    roster: String,
    posts: Arc<Mutex<Vec<serde_json::Value>>>,
    /// 1-based notification request that gets a 500
    fail_on: Option<usize>,
}

impl MockApi {
    fn new(roster: impl Into<String>) -> Self {
        Self {
            roster: roster.into(),
            posts: Arc::new(Mutex::new(Vec::new())),
            fail_on: None,
        }
    }

    fn posts(&self) -> Vec<serde_json::Value> {
        self.posts.lock().unwrap().clone()
    }
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

async fn export(State(api): State<MockApi>, headers: HeaderMap) -> (StatusCode, String) {
    if bearer(&headers) != Some("cavos-token") {
        return (StatusCode::UNAUTHORIZED, String::new());
    }
    (StatusCode::OK, api.roster.clone())
}

async fn notify(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    if bearer(&headers) != Some("world-token") {
        return StatusCode::UNAUTHORIZED;
    }
    let count = {
        let mut posts = api.posts.lock().unwrap();
        posts.push(body);
        posts.len()
    };
    if api.fail_on == Some(count) {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}

/// Serve both mock APIs and return a config pointing at them.
async fn spawn_mock(api: MockApi) -> AppConfig {
    let app = Router::new()
        .route("/export", get(export))
        .route("/notify", post(notify))
        .with_state(api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    AppConfig {
        source_url: format!("http://{addr}/export"),
        source_bearer: "cavos-token".to_string(),
        sink_url: format!("http://{addr}/notify"),
        sink_bearer: "world-token".to_string(),
        app_id: "app_e2e".to_string(),
        notify_interval_hours: 9,
        source_timeout_secs: 5,
        sink_timeout_secs: 5,
    }
}

fn build_cycle(
    config: AppConfig,
    batch_size: usize,
) -> NotificationCycle<HttpRosterSource, HttpNotificationSink> {
    let source = HttpRosterSource::new(
        config.source_url.clone(),
        config.source_bearer.clone(),
        config.source_timeout(),
    )
    .unwrap();
    let sink = HttpNotificationSink::new(
        config.sink_url.clone(),
        config.sink_bearer.clone(),
        config.sink_timeout(),
    )
    .unwrap();

    NotificationCycle::new(config, source, sink)
        .with_settings(CycleSettings {
            batch_size: NonZeroUsize::new(batch_size).unwrap(),
            catalog: MessageCatalog::default(),
        })
        .with_selector(FixedSelector(3))
}

/// Roster mixing valid identifiers in several shapes with junk rows.
fn roster() -> String {
    let mut csv = String::from("email,created_at\n");
    for i in 0..5 {
        match i % 3 {
            0 => csv.push_str(&format!("0x{i:040x}@cavos.xyz,2024-01-0{i}\n")),
            1 => csv.push_str(&format!(" '{i:040x},2024-01-0{i}\n")),
            _ => csv.push_str(&format!("{i:040x},2024-01-0{i}\n")),
        }
        csv.push_str("not-an-address@example.com,2024-02-01\n");
    }
    csv
}

fn expected_addresses() -> Vec<String> {
    (0..5).map(|i| format!("0x{i:040x}")).collect()
}

// ============================================================
// Cycle
// ============================================================

#[tokio::test]
async fn test_cycle_delivers_all_batches() {
    let api = MockApi::new(roster());
    let config = spawn_mock(api.clone()).await;
    let mut cycle = build_cycle(config, 2);

    let summary = cycle.run_cycle().await.unwrap();

    assert_eq!(summary.entries_read, 10);
    assert_eq!(summary.addresses_accepted, 5);
    assert_eq!(summary.entries_discarded, 5);
    assert_eq!(summary.batches_sent, 3);

    let posts = api.posts();
    assert_eq!(posts.len(), 3);
    for post in &posts {
        assert_eq!(post["app_id"], "app_e2e");
        assert_eq!(post["title"], "Hungry");
        assert_eq!(post["mini_app_path"], "worldapp://mini-app?app_id=app_e2e");
    }

    let delivered: Vec<String> = posts
        .iter()
        .flat_map(|p| p["addresses"].as_array().unwrap().clone())
        .map(|a| a.as_str().unwrap().to_string())
        .collect();
    assert_eq!(delivered, expected_addresses());
}

#[tokio::test]
async fn test_cycle_stops_at_failed_batch() {
    let mut api = MockApi::new(roster());
    api.fail_on = Some(2);
    let config = spawn_mock(api.clone()).await;
    let mut cycle = build_cycle(config, 2);

    let err = cycle.run_cycle().await.unwrap_err();

    assert!(matches!(err, CycleError::SinkPost { batch: 2, total: 3, .. }));
    assert_eq!(api.posts().len(), 2, "third batch must not be attempted");
}

#[tokio::test]
async fn test_cycle_header_only_roster_sends_nothing() {
    let api = MockApi::new("email\n");
    let config = spawn_mock(api.clone()).await;
    let mut cycle = build_cycle(config, 500);

    let summary = cycle.run_cycle().await.unwrap();

    assert_eq!(summary.batches_sent, 0);
    assert!(api.posts().is_empty());
}

#[tokio::test]
async fn test_cycle_rejected_roster_credentials() {
    let api = MockApi::new(roster());
    let mut config = spawn_mock(api.clone()).await;
    config.source_bearer = "stale-token".to_string();
    let mut cycle = build_cycle(config, 500);

    let err = cycle.run_cycle().await.unwrap_err();

    assert!(matches!(err, CycleError::SourceFetch(_)));
    assert!(api.posts().is_empty());
}

// ============================================================
// Scheduler
// ============================================================

#[tokio::test]
async fn test_scheduler_runs_first_cycle_immediately() {
    let api = MockApi::new(roster());
    let config = spawn_mock(api.clone()).await;
    let mut cycle = build_cycle(config.clone(), 500);
    let scheduler = Scheduler::new(config.notify_interval());

    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
    let handle = tokio::spawn(async move { scheduler.run(&mut cycle, shutdown_rx).await });

    // Wait for the first cycle's single batch to land
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    while api.posts().is_empty() {
        assert!(tokio::time::Instant::now() < deadline, "first cycle never posted");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    shutdown_tx.send(()).await.unwrap();
    let cycles = handle.await.unwrap();

    assert_eq!(cycles, 1);
    assert_eq!(api.posts().len(), 1);
}
