//! Bollinger Bands indicator.

use crate::services::signals::Indicator;
use crate::types::Candle;

/// Band values at a single candle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Bollinger Bands indicator.
///
/// Consists of:
/// - Middle band: SMA(20)
/// - Upper band: SMA + 2 * StdDev
/// - Lower band: SMA - 2 * StdDev
///
/// Standard deviation is the population deviation over the same window.
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

impl BollingerBands {
    pub fn new(period: usize, std_dev_multiplier: f64) -> Self {
        Self {
            period,
            std_dev_multiplier,
        }
    }

    /// Calculate standard deviation.
    fn std_dev(values: &[f64], mean: f64) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let variance: f64 =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        variance.sqrt()
    }
}

impl Indicator for BollingerBands {
    type Output = Bands;

    fn name(&self) -> &str {
        "Bollinger Bands"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<Bands>> {
        let mut out = vec![None; candles.len()];
        if self.period == 0 || candles.len() < self.period {
            return out;
        }

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

        for (end, window) in closes.windows(self.period).enumerate() {
            let middle = window.iter().sum::<f64>() / self.period as f64;
            let std_dev = Self::std_dev(window, middle);

            out[end + self.period - 1] = Some(Bands {
                upper: middle + self.std_dev_multiplier * std_dev,
                middle,
                lower: middle - self.std_dev_multiplier * std_dev,
            });
        }

        out
    }
}
