//! End-to-end runs against a mocked Binance endpoint

use confluence::config::Config;
use confluence::{pipeline, BinanceClient, FetchOutcome};
use serde_json::{json, Value};
use std::path::PathBuf;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DAY_MS: i64 = 86_400_000;
// 2023-01-01T00:00:00Z
const START_MS: i64 = 1_672_531_200_000;

struct TempDb(PathBuf);

impl TempDb {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("confluence-pipeline-{}.db", uuid::Uuid::new_v4())))
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

/// Kline rows, newest first to check that the client sorts them.
fn klines(count: i64) -> Value {
    let rows: Vec<Value> = (0..count)
        .rev()
        .map(|i| {
            let close = 17000.0 + i as f64 * 40.0 + ((i % 4) as f64 - 1.5) * 60.0;
            json!([
                START_MS + i * DAY_MS,
                format!("{:.2}", close - 10.0),
                format!("{:.2}", close + 80.0),
                format!("{:.2}", close - 90.0),
                format!("{:.2}", close),
                format!("{:.3}", 1000.0 + i as f64),
                START_MS + (i + 1) * DAY_MS - 1,
                "0",
                0,
                "0",
                "0",
                "0"
            ])
        })
        .collect();
    Value::Array(rows)
}

async fn mock_klines(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("symbol", "BTCUSDT"))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn test_config(server: &MockServer, db: &TempDb, limit: u32) -> Config {
    Config {
        database_path: db.0.clone(),
        price_table: "test_btc_prices".to_string(),
        candle_limit: limit,
        binance_api_url: server.uri(),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_fetch_ohlcv_sorted() {
    let server = MockServer::start().await;
    mock_klines(&server, klines(5)).await;

    let client = BinanceClient::new(server.uri());
    let outcome = client.fetch_ohlcv("BTC/USDT", "1d", 5).await;

    let candles = match outcome {
        FetchOutcome::Fetched(candles) => candles,
        other => panic!("expected candles, got {:?}", other),
    };
    assert_eq!(candles.len(), 5);
    assert!(candles.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

#[tokio::test]
async fn test_fetch_ohlcv_sends_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("limit", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(klines(3)))
        .expect(1)
        .mount(&server)
        .await;

    let client = BinanceClient::new(server.uri());
    let outcome = client.fetch_ohlcv("BTC/USDT", "1d", 200).await;
    assert_eq!(outcome.candles().len(), 3);
}

#[tokio::test]
async fn test_fetch_ohlcv_empty() {
    let server = MockServer::start().await;
    mock_klines(&server, json!([])).await;

    let client = BinanceClient::new(server.uri());
    assert_eq!(client.fetch_ohlcv("BTC/USDT", "1d", 5).await, FetchOutcome::Empty);
}

#[tokio::test]
async fn test_fetch_ohlcv_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"code": -1121, "msg": "Invalid symbol."})),
        )
        .mount(&server)
        .await;

    let client = BinanceClient::new(server.uri());
    let outcome = client.fetch_ohlcv("NOPE/USDT", "1d", 5).await;
    assert!(outcome.is_failed());
    assert!(outcome.into_candles().is_empty());
}

#[tokio::test]
async fn test_fetch_ohlcv_malformed_body() {
    let server = MockServer::start().await;
    mock_klines(&server, json!({"unexpected": true})).await;

    let client = BinanceClient::new(server.uri());
    assert!(client.fetch_ohlcv("BTC/USDT", "1d", 5).await.is_failed());
}

#[tokio::test]
async fn test_fetch_ohlcv_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = BinanceClient::new(server.uri());
    assert!(client.fetch_ohlcv("BTC/USDT", "1d", 5).await.is_failed());
}

#[tokio::test]
async fn test_pipeline_run_end_to_end() {
    let server = MockServer::start().await;
    mock_klines(&server, klines(40)).await;
    let db = TempDb::new();
    let config = test_config(&server, &db, 40);

    let first = pipeline::run(&config).await.unwrap();
    assert_eq!(first.inserted, 40);
    assert_eq!(first.rows.len(), 21);
    assert_eq!(first.counts.total(), 21);

    // Same candles again: nothing new, same signals
    let second = pipeline::run(&config).await.unwrap();
    assert_eq!(second.inserted, 0);
    assert_eq!(second.rows, first.rows);
    assert_eq!(second.counts, first.counts);
}

#[tokio::test]
async fn test_pipeline_fetch_failure_uses_stored_data() {
    let db = TempDb::new();

    {
        let server = MockServer::start().await;
        mock_klines(&server, klines(25)).await;
        let config = test_config(&server, &db, 25);
        assert_eq!(pipeline::run(&config).await.unwrap().inserted, 25);
    }

    let failing = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&failing)
        .await;
    let config = test_config(&failing, &db, 25);

    let run = pipeline::run(&config).await.unwrap();
    assert!(run.fetch.is_failed());
    assert_eq!(run.inserted, 0);
    assert_eq!(run.rows.len(), 6);
}
