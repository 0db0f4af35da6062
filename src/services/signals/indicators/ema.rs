//! Exponential Moving Average (EMA) indicator.

use crate::services::signals::Indicator;
use crate::types::Candle;

/// EMA (Exponential Moving Average) of close prices.
///
/// Like an SMA but gives more weight to recent prices. The first value is the
/// SMA of the first `period` closes; every later value applies the
/// `2 / (period + 1)` multiplier.
pub struct Ema {
    period: usize,
}

impl Default for Ema {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn name(&self) -> &str {
        match self.period {
            20 => "EMA (20)",
            _ => "EMA",
        }
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        let mut out = vec![None; candles.len()];
        if self.period == 0 || candles.len() < self.period {
            return out;
        }

        let multiplier = 2.0 / (self.period as f64 + 1.0);

        // First EMA is SMA
        let mut ema = candles
            .iter()
            .take(self.period)
            .map(|c| c.close)
            .sum::<f64>()
            / self.period as f64;
        out[self.period - 1] = Some(ema);

        for (i, candle) in candles.iter().enumerate().skip(self.period) {
            ema = (candle.close - ema) * multiplier + ema;
            out[i] = Some(ema);
        }

        out
    }
}
