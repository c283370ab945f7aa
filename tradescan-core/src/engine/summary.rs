//! End-of-period run statistics — pure functions over a trade log.

use serde::{Deserialize, Serialize};

use crate::domain::Trade;

/// Aggregate statistics for one run. Derived on demand; holds no identity.
///
/// Fields that are meaningless without trades (`win_rate`, `best_trade`,
/// `worst_trade`) are `None` when the log is empty rather than NaN or zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    /// Percentage of winning trades, 0..=100.
    pub win_rate: Option<f64>,
    pub total_pnl: f64,
    pub best_trade: Option<f64>,
    pub worst_trade: Option<f64>,
    pub profit_factor: f64,
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
    /// BUY→SELL transitions whose risk budget sized to zero shares.
    pub unsized_transitions: usize,
}

impl RunSummary {
    pub fn from_trades(trades: &[Trade]) -> Self {
        let wins = trades.iter().filter(|t| t.is_winner()).count();
        Self {
            total_trades: trades.len(),
            wins,
            losses: trades.len() - wins,
            win_rate: win_rate(trades),
            total_pnl: trades.iter().map(|t| t.pnl).sum(),
            best_trade: trades.iter().map(|t| t.pnl).reduce(f64::max),
            worst_trade: trades.iter().map(|t| t.pnl).reduce(f64::min),
            profit_factor: profit_factor(trades),
            max_consecutive_wins: max_consecutive(trades, true),
            max_consecutive_losses: max_consecutive(trades, false),
            unsized_transitions: 0,
        }
    }

    pub fn has_trades(&self) -> bool {
        self.total_trades > 0
    }
}

/// Percentage of winners; `None` for an empty log.
pub fn win_rate(trades: &[Trade]) -> Option<f64> {
    if trades.is_empty() {
        return None;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    Some(100.0 * winners as f64 / trades.len() as f64)
}

/// Profit factor: gross profits / gross losses.
///
/// Capped at 100.0 for edge cases (all winners, zero losses).
pub fn profit_factor(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let gross_profit: f64 = trades.iter().filter(|t| t.pnl > 0.0).map(|t| t.pnl).sum();
    let gross_loss: f64 = trades
        .iter()
        .filter(|t| t.pnl < 0.0)
        .map(|t| t.pnl.abs())
        .sum();

    if gross_loss < 1e-10 {
        return if gross_profit > 0.0 { 100.0 } else { 0.0 };
    }
    (gross_profit / gross_loss).min(100.0)
}

fn max_consecutive(trades: &[Trade], winners: bool) -> usize {
    let mut max_streak = 0;
    let mut current = 0;

    for trade in trades {
        if trade.is_winner() == winners {
            current += 1;
            max_streak = max_streak.max(current);
        } else {
            current = 0;
        }
    }
    max_streak
}
