//! Bar loading for the runner.
//!
//! Two sources:
//! 1. CSV files with a `timestamp,open,high,low,close,volume` header
//! 2. Synthetic intraday sessions (deterministic per symbol and date)
//!
//! Every bar goes through `Bar::try_new` and the series through `Series::new`,
//! so a malformed row fails the load with its row index. Rows are never
//! silently dropped.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use tradescan_core::{Bar, CoreError, Series};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{path}': {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("row {row}: unrecognised timestamp '{value}' (expected YYYY-MM-DD HH:MM:SS or RFC 3339)")]
    Timestamp { row: usize, value: String },

    #[error("interval must be between 1 and 375 minutes, got {0}")]
    Interval(u32),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// One CSV row before validation.
#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
}

/// Load a bar series from a CSV file.
pub fn load_csv(path: &Path, symbol: &str) -> Result<Series, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.display().to_string(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let mut bars = Vec::new();
    for (row, record) in reader.deserialize::<CsvRow>().enumerate() {
        let r = record.map_err(csv_err)?;
        let timestamp = parse_timestamp(&r.timestamp).ok_or_else(|| LoadError::Timestamp {
            row,
            value: r.timestamp.clone(),
        })?;
        let bar = Bar::try_new(timestamp, r.open, r.high, r.low, r.close, r.volume)
            .map_err(|source| CoreError::MalformedBar { index: row, source })?;
        bars.push(bar);
    }

    let series = Series::new(symbol, bars)?;
    debug!(symbol, bars = series.len(), path = %path.display(), "loaded csv");
    Ok(series)
}

/// `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`, or RFC 3339 (offset dropped,
/// wall-clock time kept).
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_local()))
}

/// First bar of the cash session, minutes after midnight (09:15).
pub const SESSION_OPEN_MINUTE: i64 = 9 * 60 + 15;
/// Session close (15:30); the last bar starts one interval before it.
pub const SESSION_CLOSE_MINUTE: i64 = 15 * 60 + 30;

/// Generate a synthetic intraday session for demos and tests.
///
/// A random walk seeded from BLAKE3(symbol, date): the same inputs always
/// produce the same bars. These prices are fake.
pub fn synthetic_session(
    symbol: &str,
    date: NaiveDate,
    interval_minutes: u32,
) -> Result<Series, LoadError> {
    if interval_minutes == 0
        || i64::from(interval_minutes) > SESSION_CLOSE_MINUTE - SESSION_OPEN_MINUTE
    {
        return Err(LoadError::Interval(interval_minutes));
    }

    let mut hasher = blake3::Hasher::new();
    hasher.update(symbol.as_bytes());
    hasher.update(date.to_string().as_bytes());
    let mut rng = StdRng::from_seed(*hasher.finalize().as_bytes());

    let midnight = date.and_time(NaiveTime::default());
    let start = midnight + Duration::minutes(SESSION_OPEN_MINUTE);
    let end = midnight + Duration::minutes(SESSION_CLOSE_MINUTE);
    let step = Duration::minutes(i64::from(interval_minutes));

    let mut bars = Vec::new();
    let mut price: f64 = rng.gen_range(100.0..2_000.0);
    let mut ts = start;
    while ts < end {
        let bar_return: f64 = rng.gen_range(-0.004..0.004);
        let open = price;
        let close = price * (1.0 + bar_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.002));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.002));
        let volume = rng.gen_range(1_000..50_000u64);

        bars.push(Bar {
            timestamp: ts,
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        ts += step;
    }

    info!(symbol, %date, bars = bars.len(), "generated synthetic session");
    Ok(Series::new(symbol, bars)?)
}

/// Consecutive synthetic sessions ending on `last_date`, one per calendar day.
///
/// Used where a previous-session close is needed, e.g. sector ranking.
pub fn synthetic_days(
    symbol: &str,
    last_date: NaiveDate,
    days: u32,
    interval_minutes: u32,
) -> Result<Series, LoadError> {
    let mut bars = Vec::new();
    for back in (0..days).rev() {
        let date = last_date - Duration::days(i64::from(back));
        bars.extend_from_slice(synthetic_session(symbol, date, interval_minutes)?.bars());
    }
    Ok(Series::new(symbol, bars)?)
}

/// Where one scan instrument's bars come from.
#[derive(Debug, Clone, PartialEq)]
pub enum BarSource {
    /// CSV file; the upper-cased file stem is the symbol.
    Csv(PathBuf),
    Synthetic {
        symbol: String,
        date: NaiveDate,
        interval_minutes: u32,
    },
}

impl BarSource {
    pub fn symbol(&self) -> String {
        match self {
            Self::Csv(path) => path
                .file_stem()
                .map(|s| s.to_string_lossy().to_uppercase())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Synthetic { symbol, .. } => symbol.clone(),
        }
    }

    pub fn load(&self) -> Result<Series, LoadError> {
        match self {
            Self::Csv(path) => load_csv(path, &self.symbol()),
            Self::Synthetic {
                symbol,
                date,
                interval_minutes,
            } => synthetic_session(symbol, *date, *interval_minutes),
        }
    }
}

/// Load every source independently.
///
/// A source that fails is reported with its symbol and does not stop the
/// rest; loaded series keep input order.
pub fn load_sources(sources: &[BarSource]) -> (Vec<Series>, Vec<(String, LoadError)>) {
    let mut loaded = Vec::with_capacity(sources.len());
    let mut failed = Vec::new();
    for source in sources {
        match source.load() {
            Ok(series) => loaded.push(series),
            Err(e) => {
                warn!(symbol = %source.symbol(), error = %e, "load failed, instrument skipped");
                failed.push((source.symbol(), e));
            }
        }
    }
    (loaded, failed)
}

/// Deterministic BLAKE3 hash over a series' symbol and bar data.
pub fn dataset_hash(series: &Series) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(series.symbol().as_bytes());
    for bar in series.bars() {
        hasher.update(bar.timestamp.to_string().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tradescan_core::BarError;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 22).unwrap()
    }

    #[test]
    fn loads_well_formed_csv() {
        let file = write_csv(
            "timestamp,open,high,low,close,volume\n\
             2025-08-22 09:15:00,100.0,101.0,99.5,100.5,1200\n\
             2025-08-22 09:20:00,100.5,102.0,100.0,101.5,900\n",
        );
        let series = load_csv(file.path(), "INFY").unwrap();
        assert_eq!(series.symbol(), "INFY");
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars()[1].close, 101.5);
        assert_eq!(series.bars()[1].volume, 900);
    }

    #[test]
    fn accepts_rfc3339_timestamps() {
        let file = write_csv(
            "timestamp,open,high,low,close,volume\n\
             2025-08-22T09:15:00+05:30,100.0,101.0,99.5,100.5,1200\n",
        );
        let series = load_csv(file.path(), "INFY").unwrap();
        assert_eq!(
            series.bars()[0].timestamp,
            day().and_hms_opt(9, 15, 0).unwrap()
        );
    }

    #[test]
    fn header_only_is_an_empty_series() {
        let file = write_csv("timestamp,open,high,low,close,volume\n");
        let series = load_csv(file.path(), "INFY").unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn negative_volume_reports_row() {
        let file = write_csv(
            "timestamp,open,high,low,close,volume\n\
             2025-08-22 09:15:00,100.0,101.0,99.5,100.5,1200\n\
             2025-08-22 09:20:00,100.5,102.0,100.0,101.5,-5\n",
        );
        let err = load_csv(file.path(), "INFY").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Core(CoreError::MalformedBar {
                index: 1,
                source: BarError::NegativeVolume(-5)
            })
        ));
    }

    #[test]
    fn out_of_order_rows_are_rejected() {
        let file = write_csv(
            "timestamp,open,high,low,close,volume\n\
             2025-08-22 09:20:00,100.0,101.0,99.5,100.5,1200\n\
             2025-08-22 09:15:00,100.5,102.0,100.0,101.5,900\n",
        );
        let err = load_csv(file.path(), "INFY").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Core(CoreError::MalformedBar { index: 1, .. })
        ));
    }

    #[test]
    fn bad_timestamp_is_reported() {
        let file = write_csv(
            "timestamp,open,high,low,close,volume\n\
             22/08/2025 09:15,100.0,101.0,99.5,100.5,1200\n",
        );
        let err = load_csv(file.path(), "INFY").unwrap_err();
        assert!(matches!(err, LoadError::Timestamp { row: 0, .. }));
    }

    #[test]
    fn missing_file_is_csv_error() {
        let err = load_csv(Path::new("/nonexistent/bars.csv"), "INFY").unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }));
    }

    #[test]
    fn synthetic_session_covers_the_trading_day() {
        let series = synthetic_session("RELIANCE", day(), 5).unwrap();
        // 09:15 .. 15:25 inclusive at 5-minute spacing
        assert_eq!(series.len(), 75);
        assert_eq!(
            series.bars()[0].timestamp,
            day().and_hms_opt(9, 15, 0).unwrap()
        );
        assert_eq!(
            series.bars()[74].timestamp,
            day().and_hms_opt(15, 25, 0).unwrap()
        );
    }

    #[test]
    fn synthetic_session_is_deterministic() {
        let a = synthetic_session("RELIANCE", day(), 5).unwrap();
        let b = synthetic_session("RELIANCE", day(), 5).unwrap();
        let c = synthetic_session("TCS", day(), 5).unwrap();
        assert_eq!(a, b);
        assert_eq!(dataset_hash(&a), dataset_hash(&b));
        assert_ne!(dataset_hash(&a), dataset_hash(&c));
    }

    #[test]
    fn synthetic_days_span_consecutive_dates() {
        let series = synthetic_days("^CNXIT", day(), 2, 5).unwrap();
        assert_eq!(series.len(), 150);
        assert_eq!(
            series.bars()[0].timestamp.date(),
            NaiveDate::from_ymd_opt(2025, 8, 21).unwrap()
        );
        assert_eq!(series.bars()[149].timestamp.date(), day());
        assert_eq!(
            &series.bars()[75..],
            synthetic_session("^CNXIT", day(), 5).unwrap().bars()
        );
    }

    #[test]
    fn one_bad_source_does_not_stop_the_others() {
        let good = write_csv(
            "timestamp,open,high,low,close,volume\n\
             2025-08-22 09:15:00,100.0,101.0,99.5,100.5,1200\n",
        );
        let sources = vec![
            BarSource::Csv(PathBuf::from("/nonexistent/bad.csv")),
            BarSource::Csv(good.path().to_path_buf()),
            BarSource::Synthetic {
                symbol: "TCS".into(),
                date: day(),
                interval_minutes: 5,
            },
            BarSource::Synthetic {
                symbol: "ITC".into(),
                date: day(),
                interval_minutes: 0,
            },
        ];
        let (loaded, failed) = load_sources(&sources);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].symbol(), "TCS");
        let failed_symbols: Vec<&str> = failed.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(failed_symbols, vec!["BAD", "ITC"]);
        assert!(matches!(failed[0].1, LoadError::Csv { .. }));
        assert!(matches!(failed[1].1, LoadError::Interval(0)));
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(matches!(
            synthetic_session("RELIANCE", day(), 0),
            Err(LoadError::Interval(0))
        ));
    }
}
