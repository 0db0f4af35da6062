//! Linear fetch → store → derive → count run.

use crate::config::Config;
use crate::error::Result;
use crate::services::{CandleStore, SignalCounter, SignalDeriver};
use crate::sources::{BinanceClient, FetchOutcome};
use crate::types::{IndicatorRow, SignalCounts};
use tracing::info;

/// Everything a single run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub fetch: FetchOutcome,
    pub inserted: usize,
    pub rows: Vec<IndicatorRow>,
    pub counts: SignalCounts,
}

/// Run the pipeline once with `config`.
///
/// Fetch failures degrade to "nothing to store"; storage errors propagate.
pub async fn run(config: &Config) -> Result<RunReport> {
    let store = CandleStore::from_config(config)?;
    let client = BinanceClient::from_config(config);

    info!("1) Fetch data from Binance...");
    let fetch = client
        .fetch_ohlcv(&config.symbol, &config.timeframe, config.candle_limit)
        .await;

    info!("2) Store data into SQLite database...");
    let inserted = store.store(fetch.candles())?;

    info!("3) Compute signals from SQLite data...");
    let rows = SignalDeriver::new().compute(&store)?;
    let counts = SignalCounter::new(&rows).analyze();

    Ok(RunReport {
        fetch,
        inserted,
        rows,
        counts,
    })
}
