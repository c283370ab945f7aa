//! TradeScan Core — intraday signal engine.
//!
//! This crate turns an ordered OHLCV bar series into trade-oriented labels and
//! a hypothetical trade log:
//! - Domain types (bars, validated series, trades)
//! - Indicator engine: EMA, RSI (Wilder), cumulative VWAP
//! - Signal classifier: per-bar BUY / SELL / HOLD from trend and momentum
//! - Trade simulator: BUY→SELL transition scan with fixed-fractional sizing
//!
//! Data flows strictly forward: bars → indicators → signals → trades → summary.
//! Nothing here performs I/O, and nothing decides whether a real order is
//! placed.

pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod signals;
pub mod sizers;

pub use domain::{Bar, BarError, Series, Trade, TradeLog};
pub use engine::{simulate_trades, RunSummary, SimulationConfig};
pub use error::CoreError;
pub use signals::{compute_signals, compute_signals_with, Signal, SignalParams, SignalRecord};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: all core types are Send + Sync.
    ///
    /// The runner hands one series per instrument to a thread pool; if any
    /// type fails this check the build breaks here.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<Bar>();
        require_sync::<Bar>();
        require_send::<Series>();
        require_sync::<Series>();
        require_send::<Trade>();
        require_sync::<Trade>();
        require_send::<TradeLog>();
        require_sync::<TradeLog>();

        // Indicator types
        require_send::<indicators::IndicatorFrame>();
        require_sync::<indicators::IndicatorFrame>();
        require_send::<indicators::Ema>();
        require_sync::<indicators::Ema>();
        require_send::<indicators::Rsi>();
        require_sync::<indicators::Rsi>();

        // Signal and simulator types
        require_send::<SignalRecord>();
        require_sync::<SignalRecord>();
        require_send::<SignalParams>();
        require_sync::<SignalParams>();
        require_send::<SimulationConfig>();
        require_sync::<SimulationConfig>();
        require_send::<RunSummary>();
        require_sync::<RunSummary>();
        require_send::<CoreError>();
        require_sync::<CoreError>();
    }

    /// Architecture contract: classification sees one row only.
    ///
    /// `classify` takes an `IndicatorRow` and thresholds, with no access to
    /// neighbouring bars. If a history parameter is ever added, this breaks.
    #[test]
    fn classifier_has_no_neighbour_access() {
        fn _check(row: &indicators::IndicatorRow, t: &signals::Thresholds) -> Signal {
            signals::classify(row, t)
        }
    }
}
