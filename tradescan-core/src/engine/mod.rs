//! Trade simulator — retrospective scan of a labeled series.
//!
//! Consumes the classifier's records and produces a trade log plus summary:
//!
//! 1. Validate capital and risk fractions
//! 2. Extract BUY→SELL adjacent-pair transitions, sizing each with a fixed
//!    fraction of capital at risk
//! 3. Summarize the resulting log
//!
//! Stop-loss and target levels are recorded on each trade but never trigger an
//! exit: this is not an intrabar stop engine.

pub mod config;
pub mod summary;
pub mod trade_extraction;

pub use config::SimulationConfig;
pub use summary::RunSummary;
pub use trade_extraction::{extract_trades, Extraction};

use crate::domain::TradeLog;
use crate::error::CoreError;
use crate::signals::SignalRecord;

/// Simulate trades over a labeled series.
///
/// Fails with `DegenerateSizing` for a non-positive stop fraction and
/// `InvalidParameter` for other unusable settings, before scanning.
/// `records` must be in strictly increasing timestamp order, as
/// `compute_signals` returns them; anything else is `UnorderedRecords`.
pub fn simulate_trades(
    records: &[SignalRecord],
    config: &SimulationConfig,
) -> Result<(TradeLog, RunSummary), CoreError> {
    config.validate()?;
    let Extraction {
        trades,
        unsized_transitions,
    } = extract_trades(records, config)?;

    let mut summary = RunSummary::from_trades(&trades);
    summary.unsized_transitions = unsized_transitions;
    Ok((trades, summary))
}
