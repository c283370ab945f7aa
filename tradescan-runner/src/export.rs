//! Export — JSON and CSV artifacts for instrument results.
//!
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: per-bar signal tape and trade log for spreadsheets
//!
//! Monetary values are written as plain decimals; currency formatting is a
//! display concern. Newer schema versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tradescan_core::{SignalRecord, Trade};

use crate::runner::{InstrumentResult, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize an `InstrumentResult` to pretty JSON.
pub fn export_json(result: &InstrumentResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize InstrumentResult to JSON")
}

/// Deserialize an `InstrumentResult` from JSON, rejecting newer schema versions.
pub fn import_json(json: &str) -> Result<InstrumentResult> {
    let result: InstrumentResult =
        serde_json::from_str(json).context("failed to deserialize InstrumentResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

fn opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.4}")).unwrap_or_default()
}

/// Per-bar signal tape.
///
/// Columns: index, timestamp, close, ema_fast, ema_slow, rsi, vwap, signal.
/// Undefined indicator values are empty cells.
pub fn export_signals_csv(records: &[SignalRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "index",
        "timestamp",
        "close",
        "ema_fast",
        "ema_slow",
        "rsi",
        "vwap",
        "signal",
    ])?;

    for r in records {
        wtr.write_record([
            r.index.to_string(),
            r.timestamp.to_string(),
            format!("{:.4}", r.close),
            opt(r.ema_fast),
            opt(r.ema_slow),
            opt(r.rsi),
            opt(r.vwap),
            r.signal.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Trade log.
///
/// Columns: entry_index, entry_time, entry_price, exit_index, exit_time,
/// exit_price, stop_loss, target, quantity, pnl, return_pct
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "entry_index",
        "entry_time",
        "entry_price",
        "exit_index",
        "exit_time",
        "exit_price",
        "stop_loss",
        "target",
        "quantity",
        "pnl",
        "return_pct",
    ])?;

    for t in trades {
        wtr.write_record([
            t.entry_index.to_string(),
            t.entry_timestamp.to_string(),
            format!("{:.4}", t.entry_price),
            t.exit_index.to_string(),
            t.exit_timestamp.to_string(),
            format!("{:.4}", t.exit_price),
            format!("{:.4}", t.stop_loss),
            format!("{:.4}", t.target),
            t.quantity.to_string(),
            format!("{:.2}", t.pnl),
            format!("{:.4}", t.return_pct()),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the artifact set for one instrument.
///
/// Creates `{symbol}_{timestamp}/` under `output_dir` containing:
/// - `result.json`: the full `InstrumentResult`
/// - `signals.csv`: per-bar signal tape
/// - `trades.csv`: trade log
///
/// Returns the path to the created directory.
pub fn save_artifacts(result: &InstrumentResult, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}",
        result.symbol,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("result.json"), export_json(result)?)?;
    std::fs::write(
        run_dir.join("signals.csv"),
        export_signals_csv(&result.records)?,
    )?;
    std::fs::write(run_dir.join("trades.csv"), export_trades_csv(&result.trades)?)?;

    Ok(run_dir)
}

/// Load an `InstrumentResult` from an artifact directory's result.json.
pub fn load_artifacts(dir: &Path) -> Result<InstrumentResult> {
    let path = dir.join("result.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tradescan_core::{RunSummary, Signal, TradeLog};

    fn sample_result() -> InstrumentResult {
        let t0 = NaiveDate::from_ymd_opt(2025, 8, 22)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        let records = vec![
            SignalRecord {
                index: 0,
                timestamp: t0,
                close: 100.0,
                ema_fast: Some(100.0),
                ema_slow: Some(100.0),
                rsi: None,
                vwap: Some(100.0),
                signal: Signal::Hold,
            },
            SignalRecord {
                index: 1,
                timestamp: t0 + chrono::Duration::minutes(5),
                close: 101.0,
                ema_fast: Some(100.1),
                ema_slow: Some(100.04),
                rsi: Some(100.0),
                vwap: Some(100.5),
                signal: Signal::Buy,
            },
        ];
        InstrumentResult {
            schema_version: SCHEMA_VERSION,
            symbol: "INFY".into(),
            config_fingerprint: "cfg".into(),
            dataset_hash: "data".into(),
            records,
            trades: TradeLog::new(),
            summary: RunSummary::from_trades(&[]),
        }
    }

    #[test]
    fn json_round_trip() {
        let result = sample_result();
        let json = export_json(&result).unwrap();
        assert_eq!(import_json(&json).unwrap(), result);
    }

    #[test]
    fn newer_schema_is_rejected() {
        let mut result = sample_result();
        result.schema_version = SCHEMA_VERSION + 1;
        let json = export_json(&result).unwrap();
        let err = import_json(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version"));
    }

    #[test]
    fn signals_csv_has_empty_cells_for_undefined() {
        let csv = export_signals_csv(&sample_result().records).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "index,timestamp,close,ema_fast,ema_slow,rsi,vwap,signal"
        );
        assert_eq!(
            lines[1],
            "0,2025-08-22 09:15:00,100.0000,100.0000,100.0000,,100.0000,HOLD"
        );
        assert!(lines[2].ends_with(",BUY"));
    }

    #[test]
    fn empty_trade_log_is_header_only() {
        let csv = export_trades_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("entry_index,entry_time"));
    }
}
