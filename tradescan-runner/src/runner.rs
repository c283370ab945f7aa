//! Instrument runner — wires signal computation, simulation and provenance.
//!
//! Two entry points:
//! - `run_instrument()`: one series, no I/O.
//! - `run_batch()`: many series on the rayon pool, one independent task each.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use tradescan_core::{
    compute_signals_with, simulate_trades, CoreError, RunSummary, Series, SignalRecord, TradeLog,
};

use crate::config::{ConfigError, ScanConfig};
use crate::data_loader::dataset_hash;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("{symbol}: {source}")]
    Engine {
        symbol: String,
        #[source]
        source: CoreError,
    },
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub symbol: String,
    pub config_fingerprint: String,
    pub dataset_hash: String,
    pub records: Vec<SignalRecord>,
    pub trades: TradeLog,
    pub summary: RunSummary,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl InstrumentResult {
    /// The last labeled bar, if any.
    pub fn latest(&self) -> Option<&SignalRecord> {
        self.records.last()
    }
}

/// Outcome of one instrument in a batch. Failures are kept, not propagated.
#[derive(Debug)]
pub struct BatchOutcome {
    pub symbol: String,
    pub result: Result<InstrumentResult, RunError>,
}

/// Label one series and simulate trades over it.
pub fn run_instrument(series: &Series, config: &ScanConfig) -> Result<InstrumentResult, RunError> {
    config.validate()?;
    let symbol = series.symbol().to_string();
    let engine_err = |source| RunError::Engine {
        symbol: symbol.clone(),
        source,
    };

    let records = compute_signals_with(series, &config.signal_params()).map_err(engine_err)?;
    let (trades, summary) = simulate_trades(&records, &config.simulation).map_err(engine_err)?;

    if summary.unsized_transitions > 0 {
        warn!(
            symbol = %symbol,
            unsized = summary.unsized_transitions,
            "transitions skipped: risk budget below one share"
        );
    }
    info!(
        symbol = %symbol,
        bars = series.len(),
        trades = summary.total_trades,
        total_pnl = summary.total_pnl,
        "instrument complete"
    );

    Ok(InstrumentResult {
        schema_version: SCHEMA_VERSION,
        symbol,
        config_fingerprint: config.fingerprint(),
        dataset_hash: dataset_hash(series),
        records,
        trades,
        summary,
    })
}

/// Run every series in parallel. Output order follows input order; one
/// instrument's failure never aborts the others.
pub fn run_batch(series: Vec<Series>, config: &ScanConfig) -> Vec<BatchOutcome> {
    debug!(instruments = series.len(), "starting batch");
    let outcomes: Vec<BatchOutcome> = series
        .into_par_iter()
        .map(|s| BatchOutcome {
            symbol: s.symbol().to_string(),
            result: run_instrument(&s, config),
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    for o in &outcomes {
        if let Err(e) = &o.result {
            warn!(symbol = %o.symbol, error = %e, "instrument failed");
        }
    }
    info!(
        succeeded = outcomes.len() - failed,
        failed,
        "batch complete"
    );
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loader::synthetic_session;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 22).unwrap()
    }

    #[test]
    fn run_instrument_fills_provenance() {
        let series = synthetic_session("RELIANCE", day(), 5).unwrap();
        let config = ScanConfig::default();
        let result = run_instrument(&series, &config).unwrap();

        assert_eq!(result.schema_version, SCHEMA_VERSION);
        assert_eq!(result.symbol, "RELIANCE");
        assert_eq!(result.records.len(), series.len());
        assert_eq!(result.config_fingerprint, config.fingerprint());
        assert_eq!(result.dataset_hash, dataset_hash(&series));
        assert_eq!(result.summary.total_trades, result.trades.len());
        assert_eq!(result.latest().map(|r| r.index), Some(series.len() - 1));
    }

    #[test]
    fn run_instrument_is_deterministic() {
        let series = synthetic_session("TCS", day(), 5).unwrap();
        let a = run_instrument(&series, &ScanConfig::default()).unwrap();
        let b = run_instrument(&series, &ScanConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_series_is_an_engine_error() {
        let empty = Series::new("EMPTY", Vec::new()).unwrap();
        let err = run_instrument(&empty, &ScanConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            RunError::Engine {
                source: CoreError::InsufficientData,
                ..
            }
        ));
    }

    #[test]
    fn invalid_config_fails_before_compute() {
        let series = synthetic_session("TCS", day(), 5).unwrap();
        let mut config = ScanConfig::default();
        config.simulation.sl_fraction = 0.0;
        assert!(matches!(
            run_instrument(&series, &config),
            Err(RunError::Config(_))
        ));
    }

    #[test]
    fn batch_keeps_order_and_isolates_failures() {
        let batch = vec![
            synthetic_session("INFY", day(), 5).unwrap(),
            Series::new("EMPTY", Vec::new()).unwrap(),
            synthetic_session("HDFCBANK", day(), 5).unwrap(),
        ];
        let outcomes = run_batch(batch, &ScanConfig::default());

        let symbols: Vec<&str> = outcomes.iter().map(|o| o.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["INFY", "EMPTY", "HDFCBANK"]);
        assert!(outcomes[0].result.is_ok());
        assert!(outcomes[1].result.is_err());
        assert!(outcomes[2].result.is_ok());
    }
}
