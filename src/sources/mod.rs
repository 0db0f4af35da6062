pub mod binance;

pub use binance::{BinanceClient, FetchOutcome};
