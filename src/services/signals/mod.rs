//! Trading signals service module.
//!
//! Provides technical indicator calculations, the confluence rule that turns
//! them into buy/sell/hold signals, and signal tallies.

pub mod confluence;
pub mod counter;
pub mod deriver;
pub mod indicators;

pub use confluence::classify;
pub use counter::SignalCounter;
pub use deriver::SignalDeriver;

use crate::types::Candle;

/// Trait for implementing technical indicators.
pub trait Indicator {
    /// Value produced for each candle.
    type Output;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Minimum number of candle periods required for a first value.
    fn min_periods(&self) -> usize;

    /// Calculate the indicator over a candle series.
    /// Returns one entry per candle; `None` while the value is undefined.
    fn compute(&self, candles: &[Candle]) -> Vec<Option<Self::Output>>;
}
