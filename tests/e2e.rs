//! End-to-end tests for the reverse-geocode PIR flow
//!
//! Full pipeline with the stub engine: fixture databases -> service startup
//! (append + preprocess) -> parameter negotiation -> two-stage client query.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use std::time::Duration;

use geopir_client::{ClientBuilder, ReverseGeocodeClient};
use geopir_core::constants::{
    SEGMENT_DB_COLS, SEGMENT_DB_ROWS, STREET_DB_COLS, STREET_DB_ROWS, STREET_RECORD_SIZE,
};
use geopir_core::{GridBounds, ServiceConfig, StubEngine};
use geopir_server::{create_router, ServiceState};
use reqwest::Client;
use tokio::net::TcpListener;

static PORT_COUNTER: AtomicU16 = AtomicU16::new(19300);

fn next_port() -> u16 {
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

const SEGMENT_COUNT: u64 = SEGMENT_DB_ROWS as u64 * SEGMENT_DB_COLS as u64;
const STREET_COUNT: u64 = STREET_DB_ROWS as u64 * STREET_DB_COLS as u64;

/// Segment identifier stored for grid cell `index` in the fixture database.
fn fixture_segment_id(index: u64) -> u16 {
    (index % STREET_COUNT) as u16
}

/// Street name stored for segment `id` in the fixture database.
fn fixture_street_name(id: u16) -> String {
    format!("Street {:05}", id)
}

fn write_fixture_databases(dir: &Path) {
    let mut segment = Vec::with_capacity(SEGMENT_COUNT as usize * 2);
    for index in 0..SEGMENT_COUNT {
        segment.extend_from_slice(&fixture_segment_id(index).to_le_bytes());
    }
    std::fs::write(dir.join("beijing_grid_to_id.bin"), segment).unwrap();

    let mut street = Vec::with_capacity(STREET_COUNT as usize * STREET_RECORD_SIZE);
    for id in 0..STREET_COUNT {
        let mut record = fixture_street_name(id as u16).into_bytes();
        record.resize(STREET_RECORD_SIZE, 0);
        street.extend_from_slice(&record);
    }
    std::fs::write(dir.join("street_names.bin"), street).unwrap();
}

/// Test harness: fixture databases in a temp dir, in-process server on a
/// unique port.
struct TestHarness {
    server_url: String,
    data_dir: PathBuf,
    http: Client,
    _shutdown: tokio::sync::oneshot::Sender<()>,
}

impl TestHarness {
    async fn new() -> Self {
        let port = next_port();
        let data_dir = std::env::temp_dir().join(format!("geopir-e2e-{}", port));
        let _ = std::fs::remove_dir_all(&data_dir);
        std::fs::create_dir_all(&data_dir).unwrap();
        write_fixture_databases(&data_dir);

        let config = ServiceConfig::from_base_dir(&data_dir);
        let state = Arc::new(ServiceState::initialize(config, &StubEngine).expect("state"));

        let addr: SocketAddr = ([127, 0, 0, 1], port).into();
        let listener = TcpListener::bind(addr).await.expect("bind");
        let router = create_router(state);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        Self {
            server_url: format!("http://127.0.0.1:{}", port),
            data_dir,
            http: Client::new(),
            _shutdown: shutdown_tx,
        }
    }

    async fn client(&self) -> ReverseGeocodeClient {
        let mut client = ClientBuilder::new(&self.server_url, Arc::new(StubEngine))
            .build()
            .expect("client");
        client.init().await.expect("init");
        client
    }

    async fn fetch_init_body(&self) -> String {
        let resp = self
            .http
            .get(format!("{}/pir?init=1", self.server_url))
            .send()
            .await
            .expect("init request");
        assert_eq!(resp.status().as_u16(), 200);
        resp.text().await.expect("body")
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}

#[tokio::test]
async fn test_full_two_stage_query() {
    let harness = TestHarness::new().await;
    let client = harness.client().await;

    let (lat, lon) = (39.9075, 116.3974);
    let index = GridBounds::BEIJING.to_index(lat, lon).unwrap();
    let expected = fixture_street_name(fixture_segment_id(index));

    let street = client.query(lat, lon).await.expect("query");
    assert_eq!(street, expected);
}

#[tokio::test]
async fn test_lower_left_corner_resolves_first_records() {
    let harness = TestHarness::new().await;
    let client = harness.client().await;

    // (LAT_MIN, LON_MIN) -> grid index 0 -> segment 0 -> first street record.
    let street = client.query(39.84, 116.28).await.expect("query");
    assert_eq!(street, fixture_street_name(0));
}

#[tokio::test]
async fn test_chaining_matches_plaintext_fixture() {
    let harness = TestHarness::new().await;
    let client = harness.client().await;

    for (lat, lon) in [(39.86, 116.30), (39.95, 116.45), (39.99, 116.48)] {
        let index = GridBounds::BEIJING.to_index(lat, lon).unwrap();
        let segment_id = fixture_segment_id(index);
        let street = client.query(lat, lon).await.expect("query");
        assert_eq!(street, fixture_street_name(segment_id));
    }
}

#[tokio::test]
async fn test_out_of_bounds_coordinate_rejected() {
    let harness = TestHarness::new().await;
    let client = harness.client().await;

    let result = client.query(40.0, 116.3).await;
    assert!(matches!(
        result,
        Err(geopir_client::ClientError::Core(
            geopir_core::Error::OutOfBounds { .. }
        ))
    ));
}

#[tokio::test]
async fn test_repeated_parameter_fetches_are_byte_identical() {
    let harness = TestHarness::new().await;

    let first = harness.fetch_init_body().await;
    let second = harness.fetch_init_body().await;
    assert_eq!(first, second);

    let parsed: serde_json::Value = serde_json::from_str(&first).unwrap();
    assert_eq!(parsed["status"], "success");
    assert_eq!(parsed["segment_params"]["db_rows"], 256);
    assert_eq!(parsed["segment_params"]["db_record_bit_size"], 16);
    assert_eq!(parsed["street_params"]["db_rows"], 134);
    assert_eq!(parsed["street_params"]["db_record_bit_size"], 480);
}

#[tokio::test]
async fn test_missing_init_param_is_bad_request() {
    let harness = TestHarness::new().await;

    let resp = harness
        .http
        .get(format!("{}/pir", harness.server_url))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn test_malformed_query_body_fails_without_killing_server() {
    let harness = TestHarness::new().await;

    let resp = harness
        .http
        .post(format!("{}/reverse/segment", harness.server_url))
        .header("content-type", "application/octet-stream")
        .body("not an encrypted request")
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status().as_u16(), 500);

    // The listening loop survives the failed request.
    let client = harness.client().await;
    let street = client.query(39.9, 116.4).await.expect("query after error");
    assert!(!street.is_empty());
}

#[tokio::test]
async fn test_health_reports_both_databases() {
    let harness = TestHarness::new().await;

    let resp = harness
        .http
        .get(format!("{}/health", harness.server_url))
        .send()
        .await
        .expect("health");
    assert_eq!(resp.status().as_u16(), 200);

    let body: serde_json::Value = resp.json().await.expect("json");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["segment_records"], SEGMENT_COUNT);
    assert_eq!(body["street_records"], STREET_COUNT);
}
