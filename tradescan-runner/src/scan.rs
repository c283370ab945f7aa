//! Scan views over finished runs: the latest label per instrument and
//! time-of-day slices of a labeled series.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tradescan_core::{Signal, SignalRecord};

use crate::runner::InstrumentResult;

/// Latest label for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRow {
    pub symbol: String,
    pub timestamp: NaiveDateTime,
    pub close: f64,
    pub signal: Signal,
}

impl ScanRow {
    /// Row from the last of `records`; `None` when there are none.
    pub fn from_records(symbol: &str, records: &[SignalRecord]) -> Option<Self> {
        records.last().map(|r| Self {
            symbol: symbol.to_string(),
            timestamp: r.timestamp,
            close: r.close,
            signal: r.signal,
        })
    }

    pub fn from_result(result: &InstrumentResult) -> Option<Self> {
        Self::from_records(&result.symbol, &result.records)
    }
}

/// Latest rows for a set of results, in input order.
pub fn latest_rows<'a>(results: impl IntoIterator<Item = &'a InstrumentResult>) -> Vec<ScanRow> {
    results.into_iter().filter_map(ScanRow::from_result).collect()
}

/// BUY/SELL rows, optionally restricted to closes strictly below `max_price`.
pub fn affordable_actionable(rows: &[ScanRow], max_price: Option<f64>) -> Vec<ScanRow> {
    rows.iter()
        .filter(|r| r.signal.is_actionable())
        .filter(|r| max_price.map_or(true, |p| r.close < p))
        .cloned()
        .collect()
}

/// Records whose wall-clock time lies in `[start, end]`, inclusive.
///
/// When `start > end` the window wraps midnight: times at or after `start`
/// or at or before `end` are kept.
pub fn filter_time_of_day(
    records: &[SignalRecord],
    start: NaiveTime,
    end: NaiveTime,
) -> Vec<SignalRecord> {
    records
        .iter()
        .filter(|r| {
            let t = r.timestamp.time();
            if start <= end {
                start <= t && t <= end
            } else {
                t >= start || t <= end
            }
        })
        .cloned()
        .collect()
}
