pub mod candle_store;
pub mod signals;

pub use candle_store::CandleStore;
pub use signals::{SignalCounter, SignalDeriver};
