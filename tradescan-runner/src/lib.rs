//! TradeScan Runner — configuration, bar loading, batch runs, scan views, export.
//!
//! This crate builds on `tradescan-core` to provide:
//! - TOML run configuration with a content fingerprint
//! - CSV bar loading and deterministic synthetic sessions
//! - Single-instrument runner and a parallel multi-instrument batch
//! - Scan views (latest signal per instrument, price cap, time-of-day window)
//! - Scan universe: index list, sector lists and sector ranking
//! - JSON/CSV artifact export

pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;
pub mod scan;
pub mod universe;

pub use config::{ConfigError, ScanConfig, ScanSection};
pub use data_loader::{
    dataset_hash, load_csv, load_sources, synthetic_days, synthetic_session, BarSource,
    LoadError,
};
pub use export::{
    export_json, export_signals_csv, export_trades_csv, import_json, load_artifacts,
    save_artifacts,
};
pub use runner::{run_batch, run_instrument, BatchOutcome, InstrumentResult, RunError, SCHEMA_VERSION};
pub use scan::{affordable_actionable, filter_time_of_day, latest_rows, ScanRow};
pub use universe::{
    rank_sectors, sector_change_pct, Scope, SectorMove, Universe, UniverseError,
    TOP_SECTOR_COUNT,
};
