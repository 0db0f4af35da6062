//! Relative Strength Index (RSI) indicator.

use crate::services::signals::Indicator;
use crate::types::Candle;

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the magnitude of recent gains to recent losses.
/// Values range from 0-100:
/// - Below 30: Oversold
/// - Above 70: Overbought
///
/// Gains and losses are smoothed with Wilder's moving average, computed as a
/// bias-adjusted exponential average with `alpha = 1 / period`. A value is
/// produced once `period` price changes have been seen.
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn name(&self) -> &str {
        "RSI (14)"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        let mut out = vec![None; candles.len()];
        if self.period == 0 {
            return out;
        }

        let decay = 1.0 - 1.0 / self.period as f64;
        let mut gain_sum = 0.0;
        let mut loss_sum = 0.0;
        let mut weight = 0.0;

        for i in 1..candles.len() {
            let change = candles[i].close - candles[i - 1].close;
            let (gain, loss) = if change > 0.0 {
                (change, 0.0)
            } else {
                (0.0, -change)
            };

            gain_sum = gain + decay * gain_sum;
            loss_sum = loss + decay * loss_sum;
            weight = 1.0 + decay * weight;

            if i < self.period {
                continue;
            }

            let avg_gain = gain_sum / weight;
            let avg_loss = loss_sum / weight;
            let total = avg_gain + avg_loss;

            // No movement at all leaves RSI undefined
            if total > 0.0 {
                out[i] = Some(100.0 * avg_gain / total);
            }
        }

        out
    }
}
