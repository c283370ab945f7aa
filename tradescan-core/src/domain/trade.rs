//! Trade — a closed hypothetical round trip produced by the simulator.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// A BUY→SELL round trip with its risk levels and realized P&L.
///
/// Stop-loss and target are recorded for audit; the simulator does not check
/// whether price touched either level before the exit bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    // ── Entry ──
    pub entry_index: usize,
    pub entry_timestamp: NaiveDateTime,
    pub entry_price: f64,

    // ── Exit ──
    pub exit_index: usize,
    pub exit_timestamp: NaiveDateTime,
    pub exit_price: f64,

    // ── Risk levels ──
    pub stop_loss: f64,
    pub target: f64,

    // ── Size and result ──
    pub quantity: u64,
    pub pnl: f64,
}

impl Trade {
    /// Return on the trade as a fraction of entry cost.
    pub fn return_pct(&self) -> f64 {
        if self.entry_price == 0.0 || self.quantity == 0 {
            return 0.0;
        }
        self.pnl / (self.entry_price * self.quantity as f64)
    }

    /// Ties (P&L == 0) count as losses.
    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }
}

/// All trades of one run, ordered by entry timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeLog(Vec<Trade>);

impl TradeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callers push in entry order; `extract_trades` rejects unordered input
    /// before it pushes anything.
    pub(crate) fn push(&mut self, trade: Trade) {
        self.0.push(trade);
    }

    pub fn into_inner(self) -> Vec<Trade> {
        self.0
    }
}

impl Deref for TradeLog {
    type Target = [Trade];

    fn deref(&self) -> &[Trade] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a TradeLog {
    type Item = &'a Trade;
    type IntoIter = std::slice::Iter<'a, Trade>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_trade(pnl: f64) -> Trade {
        let day = NaiveDate::from_ymd_opt(2025, 8, 22).unwrap();
        Trade {
            entry_index: 3,
            entry_timestamp: day.and_hms_opt(9, 30, 0).unwrap(),
            entry_price: 100.0,
            exit_index: 4,
            exit_timestamp: day.and_hms_opt(9, 35, 0).unwrap(),
            exit_price: 100.0 + pnl / 4000.0,
            stop_loss: 99.5,
            target: 101.0,
            quantity: 4000,
            pnl,
        }
    }

    #[test]
    fn return_pct_calculation() {
        let trade = sample_trade(8000.0);
        assert!((trade.return_pct() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn zero_pnl_is_not_a_winner() {
        assert!(sample_trade(1.0).is_winner());
        assert!(!sample_trade(0.0).is_winner());
        assert!(!sample_trade(-5.0).is_winner());
    }

    #[test]
    fn trade_log_serializes_as_plain_array() {
        let mut log = TradeLog::new();
        log.push(sample_trade(10.0));
        let json = serde_json::to_string(&log).unwrap();
        assert!(json.starts_with('['));
        let back: TradeLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
        assert_eq!(back.len(), 1);
    }
}
