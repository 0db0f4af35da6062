//! Technical indicator implementations.

pub mod bollinger;
pub mod ema;
pub mod rsi;
pub mod vwap;

pub use bollinger::{Bands, BollingerBands};
pub use ema::Ema;
pub use rsi::Rsi;
pub use vwap::Vwap;
