//! Trade extraction — converts BUY→SELL label transitions into Trade entries.
//!
//! Single pass over adjacent record pairs. A trade exists exactly where the
//! previous bar is BUY and the current bar is SELL: entry at the previous
//! close, exit at the current close. There is no position tracker, so
//! consecutive BUY bars do not extend a position and a trailing BUY with no
//! SELL after it produces nothing.

use tracing::{debug, warn};

use super::SimulationConfig;
use crate::domain::{Trade, TradeLog};
use crate::error::CoreError;
use crate::signals::{Signal, SignalRecord};

/// Output of a scan: the trades plus transitions that sized to zero shares.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub trades: TradeLog,
    pub unsized_transitions: usize,
}

/// Scan `records` for BUY→SELL pairs.
///
/// Records must have strictly increasing timestamps; otherwise
/// `UnorderedRecords` is returned before any trade is built. `config` must
/// already be validated; a degenerate stop distance still surfaces as an
/// error from the sizer.
pub fn extract_trades(
    records: &[SignalRecord],
    config: &SimulationConfig,
) -> Result<Extraction, CoreError> {
    if let Some(i) = records
        .windows(2)
        .position(|pair| pair[0].timestamp >= pair[1].timestamp)
    {
        return Err(CoreError::UnorderedRecords { index: i + 1 });
    }

    let sizer = config.sizer();
    let mut out = Extraction::default();

    for pair in records.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);
        if previous.signal != Signal::Buy || current.signal != Signal::Sell {
            continue;
        }

        let entry_price = previous.close;
        let exit_price = current.close;
        let quantity = sizer.quantity(config.capital, entry_price)?;

        if quantity == 0 {
            warn!(
                entry_index = previous.index,
                entry_price, "risk budget below one share's stop distance, transition skipped"
            );
            out.unsized_transitions += 1;
            continue;
        }

        let pnl = (exit_price - entry_price) * quantity as f64;
        let trade = Trade {
            entry_index: previous.index,
            entry_timestamp: previous.timestamp,
            entry_price,
            exit_index: current.index,
            exit_timestamp: current.timestamp,
            exit_price,
            stop_loss: sizer.stop_loss(entry_price),
            target: config.target(entry_price),
            quantity,
            pnl,
        };
        debug!(
            entry = %trade.entry_timestamp,
            exit = %trade.exit_timestamp,
            quantity,
            pnl,
            "trade closed"
        );
        out.trades.push(trade);
    }

    Ok(out)
}
