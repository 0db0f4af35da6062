use crate::config::Config;
use crate::error::{AppError, Result};
use crate::types::Candle;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info, warn};

const KLINES_PATH: &str = "/api/v3/klines";

/// Result of a candle fetch.
///
/// Callers that only care about data can use [`FetchOutcome::into_candles`],
/// which treats every failure as "no data".
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Candles sorted by ascending timestamp.
    Fetched(Vec<Candle>),
    /// The exchange answered with no rows.
    Empty,
    /// The request or response parsing failed.
    Failed(String),
}

impl FetchOutcome {
    pub fn into_candles(self) -> Vec<Candle> {
        match self {
            FetchOutcome::Fetched(candles) => candles,
            FetchOutcome::Empty | FetchOutcome::Failed(_) => Vec::new(),
        }
    }

    /// Borrow the fetched candles; empty unless the fetch succeeded.
    pub fn candles(&self) -> &[Candle] {
        match self {
            FetchOutcome::Fetched(candles) => candles,
            FetchOutcome::Empty | FetchOutcome::Failed(_) => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }
}

/// Binance REST client for OHLCV klines.
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
}

impl BinanceClient {
    /// Create a new Binance client against `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent("Confluence/1.0")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.binance_api_url.clone())
    }

    /// Fetch the most recent `limit` candles for `symbol` at `timeframe`.
    ///
    /// Errors are logged and reported as [`FetchOutcome::Failed`], never
    /// propagated.
    pub async fn fetch_ohlcv(&self, symbol: &str, timeframe: &str, limit: u32) -> FetchOutcome {
        info!("Fetching data for {} with timeframe {}...", symbol, timeframe);

        match self.request_klines(symbol, timeframe, limit).await {
            Ok(candles) if candles.is_empty() => {
                warn!("Binance returned no candles for {}", symbol);
                FetchOutcome::Empty
            }
            Ok(candles) => {
                debug!("Fetched {} candles for {}", candles.len(), symbol);
                FetchOutcome::Fetched(candles)
            }
            Err(e) => {
                error!("Error fetching data from Binance: {}", e);
                FetchOutcome::Failed(e.to_string())
            }
        }
    }

    async fn request_klines(&self, symbol: &str, timeframe: &str, limit: u32) -> Result<Vec<Candle>> {
        let url = format!("{}{}", self.base_url, KLINES_PATH);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", market_id(symbol)),
                ("interval", timeframe.to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(
                "Binance API returned {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            );
            return Err(AppError::ExternalApi(format!("Binance API error: {}", status)));
        }

        let text = response.text().await?;
        decode_klines(&text)
    }
}

/// Convert a unified symbol (`BTC/USDT`) to a Binance market id (`BTCUSDT`).
pub fn market_id(symbol: &str) -> String {
    symbol.replace('/', "").to_uppercase()
}

fn decode_klines(text: &str) -> Result<Vec<Candle>> {
    let body: Value = serde_json::from_str(text)?;
    parse_klines(&body)
}

/// Parse a klines response body into candles sorted by open time.
///
/// Each row is `[open_time_ms, "open", "high", "low", "close", "volume", ...]`.
fn parse_klines(body: &Value) -> Result<Vec<Candle>> {
    let rows = body
        .as_array()
        .ok_or_else(|| AppError::ExternalApi("Klines response is not an array".to_string()))?;

    let mut candles = rows
        .iter()
        .map(parse_kline)
        .collect::<Result<Vec<Candle>>>()?;
    candles.sort_by_key(|c| c.timestamp);

    Ok(candles)
}

fn parse_kline(row: &Value) -> Result<Candle> {
    let fields = row
        .as_array()
        .filter(|f| f.len() >= 6)
        .ok_or_else(|| AppError::ExternalApi(format!("Malformed kline row: {}", row)))?;

    let open_time = fields[0]
        .as_i64()
        .ok_or_else(|| AppError::ExternalApi(format!("Invalid kline open time: {}", fields[0])))?;
    let timestamp = Candle::time_from_millis(open_time)
        .ok_or_else(|| AppError::ExternalApi(format!("Kline open time out of range: {}", open_time)))?;

    Ok(Candle {
        timestamp,
        open: number(&fields[1], "open")?,
        high: number(&fields[2], "high")?,
        low: number(&fields[3], "low")?,
        close: number(&fields[4], "close")?,
        volume: number(&fields[5], "volume")?,
    })
}

/// Binance encodes prices as decimal strings; accept plain numbers too.
fn number(value: &Value, field: &str) -> Result<f64> {
    let parsed = match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.ok_or_else(|| AppError::ExternalApi(format!("Invalid kline {}: {}", field, value)))
}
