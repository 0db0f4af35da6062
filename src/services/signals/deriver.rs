//! Indicator computation and signal derivation over stored candles.

use super::indicators::{BollingerBands, Ema, Rsi, Vwap};
use super::{classify, Indicator};
use crate::error::Result;
use crate::services::CandleStore;
use crate::types::{Candle, IndicatorRow, Signal};
use tracing::{debug, info};

/// Computes EMA (20), RSI (14), VWAP and Bollinger (20, 2) for every candle
/// and attaches a confluence signal.
pub struct SignalDeriver {
    ema: Ema,
    rsi: Rsi,
    vwap: Vwap,
    bollinger: BollingerBands,
}

impl Default for SignalDeriver {
    fn default() -> Self {
        Self {
            ema: Ema::new(20),
            rsi: Rsi::new(14),
            vwap: Vwap,
            bollinger: BollingerBands::new(20, 2.0),
        }
    }
}

impl SignalDeriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every stored candle and derive indicator rows.
    ///
    /// An empty or missing table yields an empty result.
    pub fn compute(&self, store: &CandleStore) -> Result<Vec<IndicatorRow>> {
        let candles = store.load_all()?;
        if candles.is_empty() {
            info!("No data available to compute signals");
            return Ok(Vec::new());
        }

        let rows = self.derive(&candles);
        info!(
            "Computed signals for {} of {} candles in {}",
            rows.len(),
            candles.len(),
            store.table()
        );
        Ok(rows)
    }

    /// Indicator with the longest warm-up, as (name, candles needed).
    fn warm_up(&self) -> (&str, usize) {
        [
            (self.ema.name(), self.ema.min_periods()),
            (self.rsi.name(), self.rsi.min_periods()),
            (self.vwap.name(), self.vwap.min_periods()),
            (self.bollinger.name(), self.bollinger.min_periods()),
        ]
        .into_iter()
        .max_by_key(|&(_, periods)| periods)
        .unwrap_or(("", 0))
    }

    /// Derive indicator rows for candles sorted by ascending timestamp.
    ///
    /// Candles where any indicator is still undefined are dropped.
    pub fn derive(&self, candles: &[Candle]) -> Vec<IndicatorRow> {
        let (slowest, needed) = self.warm_up();
        if candles.len() < needed {
            debug!(
                "{} needs {} candles, only {} available",
                slowest,
                needed,
                candles.len()
            );
            return Vec::new();
        }

        let ema = self.ema.compute(candles);
        let rsi = self.rsi.compute(candles);
        let vwap = self.vwap.compute(candles);
        let bands = self.bollinger.compute(candles);

        let rows: Vec<IndicatorRow> = candles
            .iter()
            .enumerate()
            .filter_map(|(i, candle)| {
                let band = bands[i]?;
                let mut row = IndicatorRow {
                    timestamp: candle.timestamp,
                    open: candle.open,
                    high: candle.high,
                    low: candle.low,
                    close: candle.close,
                    volume: candle.volume,
                    ema_20: ema[i]?,
                    rsi: rsi[i]?,
                    vwap: vwap[i]?,
                    bb_upper: band.upper,
                    bb_lower: band.lower,
                    signal: Signal::Hold,
                };
                row.signal = classify(&row);
                Some(row)
            })
            .collect();

        debug!(
            "Dropped {} warm-up rows ({} needs {} candles)",
            candles.len().saturating_sub(rows.len()),
            slowest,
            needed
        );
        rows
    }
}
