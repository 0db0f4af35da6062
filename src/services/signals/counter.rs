//! Signal tallies.

use crate::types::{IndicatorRow, Signal, SignalCounts};

/// Counts buy, sell and hold signals over a result set.
pub struct SignalCounter<'a> {
    rows: &'a [IndicatorRow],
}

impl<'a> SignalCounter<'a> {
    pub fn new(rows: &'a [IndicatorRow]) -> Self {
        Self { rows }
    }

    /// Tally the signals. Empty input gives all zeros.
    pub fn analyze(&self) -> SignalCounts {
        self.rows.iter().map(|row| row.signal).collect()
    }
}

impl FromIterator<Signal> for SignalCounts {
    fn from_iter<I: IntoIterator<Item = Signal>>(iter: I) -> Self {
        iter.into_iter()
            .fold(SignalCounts::default(), |mut counts, signal| {
                match signal {
                    Signal::Buy => counts.buy += 1,
                    Signal::Sell => counts.sell += 1,
                    Signal::Hold => counts.hold += 1,
                }
                counts
            })
    }
}
