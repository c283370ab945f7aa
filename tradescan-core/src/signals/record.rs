//! SignalRecord — one labeled bar, plus read-only views over a labeled series.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Signal;

/// A bar's close, its indicator values and its label. Created once by the
/// classifier pipeline and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub index: usize,
    pub timestamp: NaiveDateTime,
    pub close: f64,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub rsi: Option<f64>,
    pub vwap: Option<f64>,
    pub signal: Signal,
}

/// Tally of labels across a labeled series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalCounts {
    pub buy: usize,
    pub sell: usize,
    pub hold: usize,
}

impl SignalCounts {
    pub fn from_records(records: &[SignalRecord]) -> Self {
        records.iter().fold(Self::default(), |mut counts, r| {
            counts.add(r.signal);
            counts
        })
    }

    pub fn add(&mut self, signal: Signal) {
        match signal {
            Signal::Buy => self.buy += 1,
            Signal::Sell => self.sell += 1,
            Signal::Hold => self.hold += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.buy + self.sell + self.hold
    }
}

/// The most recent BUY or SELL record, if any.
///
/// This is what an order-routing collaborator reacts to; the core itself never
/// decides whether an order is placed.
pub fn latest_actionable(records: &[SignalRecord]) -> Option<&SignalRecord> {
    records.iter().rev().find(|r| r.signal.is_actionable())
}
