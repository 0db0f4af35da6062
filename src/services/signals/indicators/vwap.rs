//! Volume Weighted Average Price (VWAP) indicator.

use crate::services::signals::Indicator;
use crate::types::Candle;
use chrono::NaiveDate;

/// VWAP (Volume Weighted Average Price) indicator.
///
/// Average price weighted by volume, anchored to the UTC calendar day:
/// VWAP = Cumulative(TP * Volume) / Cumulative(Volume)
///
/// The running sums reset whenever a candle opens on a new day, so on daily
/// candles every row is its own session and VWAP equals the typical price.
#[derive(Default)]
pub struct Vwap;

impl Indicator for Vwap {
    type Output = f64;

    fn name(&self) -> &str {
        "VWAP"
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        let mut out = Vec::with_capacity(candles.len());
        let mut session: Option<NaiveDate> = None;
        let mut cum_tp_vol = 0.0;
        let mut cum_vol = 0.0;

        for candle in candles {
            let day = candle.timestamp.date();
            if session != Some(day) {
                session = Some(day);
                cum_tp_vol = 0.0;
                cum_vol = 0.0;
            }

            cum_tp_vol += candle.typical_price() * candle.volume;
            cum_vol += candle.volume;

            out.push(if cum_vol > 0.0 {
                Some(cum_tp_vol / cum_vol)
            } else {
                None
            });
        }

        out
    }
}
