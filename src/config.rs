use std::env;
use std::path::PathBuf;

/// Default SQLite database file.
pub const DEFAULT_DATABASE_PATH: &str = "crypto_btc.db";
/// Default price table.
pub const DEFAULT_PRICE_TABLE: &str = "btc_prices";
/// Default trading pair.
pub const DEFAULT_SYMBOL: &str = "BTC/USDT";
/// Default candle interval (1 day).
pub const DEFAULT_TIMEFRAME: &str = "1d";
/// Default number of candles to request.
pub const DEFAULT_CANDLE_LIMIT: u32 = 200;
/// Default Binance REST endpoint.
pub const DEFAULT_BINANCE_API_URL: &str = "https://api.binance.com";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file.
    pub database_path: PathBuf,
    /// Table holding the candles.
    pub price_table: String,
    /// Trading pair, e.g. `BTC/USDT`.
    pub symbol: String,
    /// Candle interval, e.g. `1d`.
    pub timeframe: String,
    /// Number of most recent candles to fetch.
    pub candle_limit: u32,
    /// Binance REST base URL.
    pub binance_api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            price_table: DEFAULT_PRICE_TABLE.to_string(),
            symbol: DEFAULT_SYMBOL.to_string(),
            timeframe: DEFAULT_TIMEFRAME.to_string(),
            candle_limit: DEFAULT_CANDLE_LIMIT,
            binance_api_url: DEFAULT_BINANCE_API_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            database_path: env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            price_table: env::var("PRICE_TABLE").unwrap_or(defaults.price_table),
            symbol: env::var("SYMBOL").unwrap_or(defaults.symbol),
            timeframe: env::var("TIMEFRAME").unwrap_or(defaults.timeframe),
            candle_limit: env::var("CANDLE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.candle_limit),
            binance_api_url: env::var("BINANCE_API_URL").unwrap_or(defaults.binance_api_url),
        }
    }
}
