use super::Candle;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Discrete trade signal derived from indicator confluence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    Hold,
}

impl Signal {
    /// Numeric form: +1 buy, -1 sell, 0 hold.
    pub fn value(&self) -> i8 {
        match self {
            Signal::Buy => 1,
            Signal::Sell => -1,
            Signal::Hold => 0,
        }
    }
}

/// A stored candle extended with its indicator values and signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub ema_20: f64,
    pub rsi: f64,
    pub vwap: f64,
    pub bb_upper: f64,
    pub bb_lower: f64,
    pub signal: Signal,
}

impl IndicatorRow {
    /// The underlying candle.
    pub fn candle(&self) -> Candle {
        Candle {
            timestamp: self.timestamp,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        }
    }
}

/// Tally of signals over a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignalCounts {
    pub buy: usize,
    pub sell: usize,
    pub hold: usize,
}

impl SignalCounts {
    /// Total number of signals counted.
    pub fn total(&self) -> usize {
        self.buy + self.sell + self.hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_values() {
        assert_eq!(Signal::Buy.value(), 1);
        assert_eq!(Signal::Sell.value(), -1);
        assert_eq!(Signal::Hold.value(), 0);
    }

    #[test]
    fn test_signal_default_is_hold() {
        assert_eq!(Signal::default(), Signal::Hold);
    }

    #[test]
    fn test_signal_serialization() {
        assert_eq!(serde_json::to_string(&Signal::Buy).unwrap(), "\"buy\"");
        let parsed: Signal = serde_json::from_str("\"sell\"").unwrap();
        assert_eq!(parsed, Signal::Sell);
    }

    #[test]
    fn test_counts_total() {
        let counts = SignalCounts { buy: 2, sell: 3, hold: 5 };
        assert_eq!(counts.total(), 10);
        assert_eq!(SignalCounts::default().total(), 0);
    }
}
