//! Console rendering of a run.

use crate::types::{format_timestamp, IndicatorRow, SignalCounts};

/// Number of trailing rows shown after the tally.
pub const TAIL_ROWS: usize = 5;

/// Signal tally block.
pub fn render_counts(counts: &SignalCounts) -> String {
    format!(
        "--- ANALYSIS RESULTS ---\nBuy signals  : {}\nSell signals : {}\nHold signals : {}\n",
        counts.buy, counts.sell, counts.hold
    )
}

/// Table of the last `n` indicator rows.
pub fn render_tail(rows: &[IndicatorRow], n: usize) -> String {
    if rows.is_empty() {
        return "No signal data.\n".to_string();
    }

    let mut out = format!(
        "{:<26} {:>12} {:>12} {:>12} {:>12} {:>14} {:>12} {:>7} {:>12} {:>12} {:>12} {:>6}\n",
        "timestamp", "open", "high", "low", "close", "volume", "EMA_20", "RSI", "VWAP",
        "BB_upper", "BB_lower", "signal"
    );

    for row in &rows[rows.len().saturating_sub(n)..] {
        out.push_str(&format!(
            "{:<26} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>14.4} {:>12.2} {:>7.2} {:>12.2} {:>12.2} {:>12.2} {:>6}\n",
            format_timestamp(&row.timestamp),
            row.open,
            row.high,
            row.low,
            row.close,
            row.volume,
            row.ema_20,
            row.rsi,
            row.vwap,
            row.bb_upper,
            row.bb_lower,
            row.signal.value(),
        ));
    }

    out
}

/// Full end-of-run report.
pub fn render(counts: &SignalCounts, rows: &[IndicatorRow]) -> String {
    format!(
        "\n{}\nLast {} signals data:\n{}",
        render_counts(counts),
        TAIL_ROWS,
        render_tail(rows, TAIL_ROWS)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Signal;
    use chrono::{Duration, NaiveDate};

    fn rows(count: i64) -> Vec<IndicatorRow> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..count)
            .map(|i| IndicatorRow {
                timestamp: start + Duration::days(i),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.5,
                volume: 10.0,
                ema_20: 100.0,
                rsi: 55.0,
                vwap: 100.1,
                bb_upper: 103.0,
                bb_lower: 97.0,
                signal: Signal::Buy,
            })
            .collect()
    }

    #[test]
    fn test_render_counts() {
        let text = render_counts(&SignalCounts { buy: 3, sell: 1, hold: 7 });
        assert!(text.contains("Buy signals  : 3"));
        assert!(text.contains("Sell signals : 1"));
        assert!(text.contains("Hold signals : 7"));
    }

    #[test]
    fn test_render_tail_limits_rows() {
        let text = render_tail(&rows(8), 5);
        // Header plus five rows
        assert_eq!(text.lines().count(), 6);
        assert!(text.contains("2023-01-08 00:00:00.000000"));
        assert!(!text.contains("2023-01-03 00:00:00"));
    }

    #[test]
    fn test_render_tail_fewer_rows_than_limit() {
        let text = render_tail(&rows(2), 5);
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_render_tail_empty() {
        assert_eq!(render_tail(&[], 5), "No signal data.\n");
    }
}
