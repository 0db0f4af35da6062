//! Fixed-threshold confluence rule.

use crate::types::{IndicatorRow, Signal};

/// RSI level splitting bullish from bearish momentum.
pub const RSI_MIDLINE: f64 = 50.0;
/// RSI level above which a buy is withheld.
pub const RSI_OVERBOUGHT: f64 = 70.0;

/// Classify a row from its close price and indicator values.
///
/// Buy when close is above EMA and VWAP, RSI sits strictly between 50 and 70
/// and close is still under the upper band. Sell when close is below EMA and
/// VWAP, RSI is under 50 and close is still over the lower band. Anything
/// else holds. The row's existing `signal` field is ignored.
pub fn classify(row: &IndicatorRow) -> Signal {
    let close = row.close;

    let bullish = close > row.ema_20
        && close > row.vwap
        && row.rsi > RSI_MIDLINE
        && row.rsi < RSI_OVERBOUGHT
        && close < row.bb_upper;

    if bullish {
        return Signal::Buy;
    }

    let bearish = close < row.ema_20
        && close < row.vwap
        && row.rsi < RSI_MIDLINE
        && close > row.bb_lower;

    if bearish {
        Signal::Sell
    } else {
        Signal::Hold
    }
}
