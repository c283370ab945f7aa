//! TradeScan CLI — signal, simulation and scan commands.
//!
//! Commands:
//! - `signals`: label one instrument's bars and print the latest records
//! - `simulate`: label, simulate BUY→SELL trades, print the end-of-day summary
//! - `scan`: run many instruments in parallel and list the latest signal per instrument,
//!   optionally over a universe scope (index, all sectors, top sectors)
//!
//! Reports go to stdout; logs go to stderr (`-v` for debug, `-vv` for trace).

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;
use tradescan_core::signals::SignalCounts;
use tradescan_core::{Series, SignalRecord};
use tradescan_runner::{
    affordable_actionable, filter_time_of_day, load_csv, load_sources, rank_sectors, run_batch,
    run_instrument, save_artifacts, sector_change_pct, synthetic_days, synthetic_session,
    BarSource, InstrumentResult, ScanConfig, ScanRow, Scope, SectorMove, Universe,
};

#[derive(Parser)]
#[command(
    name = "tradescan",
    about = "TradeScan CLI — intraday EMA/RSI/VWAP signal scanner"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Label each bar BUY/SELL/HOLD and print the most recent records.
    Signals {
        #[command(flatten)]
        source: SourceArgs,

        /// Number of trailing records to print.
        #[arg(long, default_value_t = 20)]
        tail: usize,
    },
    /// Simulate BUY→SELL trades and print the end-of-day summary.
    Simulate {
        #[command(flatten)]
        source: SourceArgs,

        /// Save result.json, signals.csv and trades.csv under this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Run many instruments in parallel and list the latest signal for each.
    Scan(ScanArgs),
}

#[derive(Args)]
struct ScanArgs {
    /// CSV files; the file stem is used as the symbol.
    #[arg(long = "input", num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Symbols to generate synthetic sessions for.
    #[arg(long = "synthetic", num_args = 1..)]
    synthetic: Vec<String>,

    /// Add a universe slice (index, all-sectors, top-sectors) as synthetic sessions.
    #[arg(long)]
    scope: Option<Scope>,

    /// Universe TOML file; defaults to the built-in NSE lists.
    #[arg(long, requires = "scope")]
    universe: Option<PathBuf>,

    /// Sector index bars for ranking, as NAME=CSV (repeatable).
    #[arg(long = "sector", value_parser = parse_sector_input, requires = "scope")]
    sector_inputs: Vec<(String, PathBuf)>,

    #[command(flatten)]
    session: SessionArgs,

    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only list actionable instruments whose last close is below this price.
    #[arg(long)]
    max_price: Option<f64>,

    /// Window start (HH:MM); the latest record inside the window is reported.
    /// A start after the end wraps midnight.
    #[arg(long, requires = "end")]
    start: Option<String>,

    /// Window end (HH:MM), inclusive.
    #[arg(long, requires = "start")]
    end: Option<String>,
}

/// Where one instrument's bars come from.
#[derive(Args)]
struct SourceArgs {
    /// CSV file with a timestamp,open,high,low,close,volume header.
    #[arg(long, conflicts_with = "synthetic")]
    input: Option<PathBuf>,

    /// Symbol label for the series.
    #[arg(long, default_value = "RELIANCE")]
    symbol: String,

    /// Generate a deterministic synthetic session instead of reading a file.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    #[command(flatten)]
    session: SessionArgs,

    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Synthetic session shape.
#[derive(Args)]
struct SessionArgs {
    /// Session date for synthetic data (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    date: Option<String>,

    /// Bar interval in minutes for synthetic data.
    #[arg(long, default_value_t = 5)]
    interval: u32,
}

impl SessionArgs {
    fn date(&self) -> Result<NaiveDate> {
        Ok(self
            .date
            .as_deref()
            .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
            .transpose()
            .context("--date must be YYYY-MM-DD")?
            .unwrap_or_else(|| chrono::Local::now().date_naive()))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Signals { source, tail } => run_signals_cmd(&source, tail),
        Commands::Simulate { source, output_dir } => {
            run_simulate_cmd(&source, output_dir.as_deref())
        }
        Commands::Scan(scan) => run_scan_cmd(&scan),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(Targets::new().with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();
}

fn load_config(path: Option<&Path>) -> Result<ScanConfig> {
    match path {
        Some(p) => ScanConfig::from_file(p).with_context(|| format!("loading {}", p.display())),
        None => Ok(ScanConfig::default()),
    }
}

fn load_source(source: &SourceArgs) -> Result<Series> {
    match (&source.input, source.synthetic) {
        (Some(path), false) => load_csv(path, &source.symbol)
            .with_context(|| format!("loading bars from {}", path.display())),
        (None, true) => Ok(synthetic_session(
            &source.symbol,
            source.session.date()?,
            source.session.interval,
        )?),
        _ => bail!("one of --input or --synthetic is required"),
    }
}

fn run_signals_cmd(source: &SourceArgs, tail: usize) -> Result<()> {
    let config = load_config(source.config.as_deref())?;
    let series = load_source(source)?;
    let result = run_instrument(&series, &config)?;

    print_records(&result.symbol, &result.records, tail);
    print_counts(&SignalCounts::from_records(&result.records));
    if let Some(r) = tradescan_core::signals::latest_actionable(&result.records) {
        println!(
            "Latest actionable: {} at {} (close {:.2})",
            r.signal, r.timestamp, r.close
        );
    }
    Ok(())
}

fn run_simulate_cmd(source: &SourceArgs, output_dir: Option<&Path>) -> Result<()> {
    let config = load_config(source.config.as_deref())?;
    let series = load_source(source)?;
    let result = run_instrument(&series, &config)?;

    print_trades(&result);
    print_summary(&result, &config);

    if let Some(dir) = output_dir {
        let run_dir = save_artifacts(&result, dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

fn run_scan_cmd(scan: &ScanArgs) -> Result<()> {
    let config = load_config(scan.config.as_deref())?;
    let window = scan
        .start
        .as_deref()
        .zip(scan.end.as_deref())
        .map(|(s, e)| Ok::<_, anyhow::Error>((parse_hhmm(s)?, parse_hhmm(e)?)))
        .transpose()?;
    let date = scan.session.date()?;

    let mut synthetic = scan.synthetic.clone();
    if let Some(scope) = scan.scope {
        let universe = match &scan.universe {
            Some(p) => {
                Universe::from_file(p).with_context(|| format!("loading {}", p.display()))?
            }
            None => Universe::default_nse(),
        };
        let ranked = if scope == Scope::TopSectors {
            let ranked =
                rank_universe_sectors(&universe, &scan.sector_inputs, date, &scan.session)?;
            print_sectors(&ranked);
            ranked
        } else {
            Vec::new()
        };
        for symbol in universe.select(scope, &ranked) {
            if !synthetic.contains(&symbol) {
                synthetic.push(symbol);
            }
        }
        info!(scope = %scope, instruments = synthetic.len(), "universe selected");
    }
    if scan.inputs.is_empty() && synthetic.is_empty() {
        bail!("nothing to scan: pass --input <csv>..., --synthetic <symbol>... or --scope");
    }

    let sources: Vec<BarSource> = scan
        .inputs
        .iter()
        .cloned()
        .map(BarSource::Csv)
        .chain(synthetic.into_iter().map(|symbol| BarSource::Synthetic {
            symbol,
            date,
            interval_minutes: scan.session.interval,
        }))
        .collect();
    let (batch, load_failures) = load_sources(&sources);
    let mut failures = load_failures.len();
    for (symbol, e) in &load_failures {
        eprintln!("Error for {symbol}: {e}");
    }

    let mut rows = Vec::new();
    for outcome in run_batch(batch, &config) {
        match outcome.result {
            Ok(result) => {
                let row = match window {
                    Some((start, end)) => ScanRow::from_records(
                        &result.symbol,
                        &filter_time_of_day(&result.records, start, end),
                    ),
                    None => ScanRow::from_result(&result),
                };
                rows.extend(row);
            }
            Err(e) => {
                failures += 1;
                eprintln!("Error for {}: {e}", outcome.symbol);
            }
        }
    }

    print_scan(&rows);
    let cap = scan.max_price.or(config.scan.max_price);
    let picked = affordable_actionable(&rows, cap);
    println!();
    match cap {
        Some(p) => println!("Actionable below {p:.2}: {}", picked.len()),
        None => println!("Actionable: {}", picked.len()),
    }
    for row in &picked {
        println!("  {:<12} {:<5} {:>12.2}", row.symbol, row.signal.as_str(), row.close);
    }

    if failures > 0 {
        bail!("{failures} instrument(s) failed");
    }
    Ok(())
}

/// Rank every universe sector by its index's change since the previous
/// session. Sectors without a `--sector` CSV get two synthetic sessions.
fn rank_universe_sectors(
    universe: &Universe,
    sector_inputs: &[(String, PathBuf)],
    date: NaiveDate,
    session: &SessionArgs,
) -> Result<Vec<SectorMove>> {
    let mut moves = Vec::new();
    for sector in universe.sector_names() {
        let series = match sector_inputs.iter().find(|(name, _)| name == sector) {
            Some((_, path)) => load_csv(path, sector)
                .with_context(|| format!("loading sector bars from {}", path.display()))?,
            None => synthetic_days(sector, date, 2, session.interval)?,
        };
        match sector_change_pct(&series) {
            Some(change_pct) => moves.push(SectorMove {
                sector: sector.to_string(),
                change_pct,
            }),
            None => warn!(sector, "no previous session close, sector left unranked"),
        }
    }
    Ok(rank_sectors(moves))
}

fn parse_sector_input(s: &str) -> Result<(String, PathBuf), String> {
    let (name, path) = s
        .split_once('=')
        .ok_or_else(|| format!("'{s}' is not NAME=PATH"))?;
    Ok((name.trim().to_string(), PathBuf::from(path.trim())))
}

fn parse_hhmm(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").with_context(|| format!("'{s}' is not HH:MM"))
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.2}")).unwrap_or_else(|| "-".into())
}

fn print_records(symbol: &str, records: &[SignalRecord], tail: usize) {
    println!();
    println!("=== Signals: {symbol} ===");
    println!(
        "{:<20} {:>10} {:>10} {:>10} {:>7} {:>10}  Signal",
        "Time", "Close", "EMA fast", "EMA slow", "RSI", "VWAP"
    );
    let skip = records.len().saturating_sub(tail);
    for r in &records[skip..] {
        println!(
            "{:<20} {:>10.2} {:>10} {:>10} {:>7} {:>10}  {}",
            r.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            r.close,
            fmt_opt(r.ema_fast),
            fmt_opt(r.ema_slow),
            fmt_opt(r.rsi),
            fmt_opt(r.vwap),
            r.signal
        );
    }
}

/// `label:` padded so every summary value starts in the same column.
fn field(label: &str, value: impl std::fmt::Display) -> String {
    format!("{:<17}{value}", format!("{label}:"))
}

fn print_counts(counts: &SignalCounts) {
    println!();
    println!("--- Signal Summary ---");
    println!("{}", field("BUY", counts.buy));
    println!("{}", field("SELL", counts.sell));
    println!("{}", field("HOLD", counts.hold));
    println!();
}

fn print_trades(result: &InstrumentResult) {
    if result.trades.is_empty() {
        return;
    }
    println!();
    println!("=== Trades: {} ===", result.symbol);
    for t in result.trades.iter() {
        println!(
            "{} → {}  qty {:>6}  entry {:>10.2}  exit {:>10.2}  SL {:>10.2}  TP {:>10.2}  P&L {:>12.2}",
            t.entry_timestamp.format("%H:%M"),
            t.exit_timestamp.format("%H:%M"),
            t.quantity,
            t.entry_price,
            t.exit_price,
            t.stop_loss,
            t.target,
            t.pnl
        );
    }
}

fn summary_lines(result: &InstrumentResult, config: &ScanConfig) -> Vec<String> {
    let s = &result.summary;
    let mut lines = vec![
        field("Symbol", &result.symbol),
        field("Bars", result.records.len()),
        field("Capital", format!("{:.2}", config.simulation.capital)),
        field("Trades", s.total_trades),
    ];
    if !s.has_trades() {
        lines.push("No trades executed".into());
        return lines;
    }
    lines.push(field("Wins", s.wins));
    lines.push(field("Losses", s.losses));
    if let Some(rate) = s.win_rate {
        lines.push(field("Win Rate", format!("{rate:.1}%")));
    }
    lines.push(field("Total P&L", format!("{:.2}", s.total_pnl)));
    if let (Some(best), Some(worst)) = (s.best_trade, s.worst_trade) {
        lines.push(field("Best Trade", format!("{best:.2}")));
        lines.push(field("Worst Trade", format!("{worst:.2}")));
    }
    lines.push(field("Profit Factor", format!("{:.2}", s.profit_factor)));
    lines.push(field("Max Consec Win", s.max_consecutive_wins));
    lines.push(field("Max Consec Loss", s.max_consecutive_losses));
    lines
}

fn print_summary(result: &InstrumentResult, config: &ScanConfig) {
    let s = &result.summary;
    println!();
    println!("=== End-of-Day Summary ===");
    for line in summary_lines(result, config) {
        println!("{line}");
    }
    if s.unsized_transitions > 0 {
        println!();
        println!(
            "WARNING: {} transition(s) skipped, risk budget below one share",
            s.unsized_transitions
        );
    }
    if config.scan.live_mode {
        println!("Live mode flag is set (informational; no orders are placed)");
    }
    println!();
}

fn print_sectors(ranked: &[SectorMove]) {
    println!();
    println!("=== Sector Performance ===");
    for m in ranked {
        println!("{:<16} {:>+8.2}%", m.sector, m.change_pct);
    }
}

fn print_scan(rows: &[ScanRow]) {
    println!();
    println!("=== Scan ===");
    println!("{:<12} {:<17} {:>12}  Signal", "Symbol", "Time", "Close");
    for row in rows {
        println!(
            "{:<12} {:<17} {:>12.2}  {}",
            row.symbol,
            row.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            row.close,
            row.signal
        );
    }
}
