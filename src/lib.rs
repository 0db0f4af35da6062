//! Confluence - daily OHLCV collector with confluence trade signals

pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod services;
pub mod sources;
pub mod types;

// Re-export commonly used types
pub use types::*;
pub use services::{CandleStore, SignalCounter, SignalDeriver};
pub use sources::{BinanceClient, FetchOutcome};
