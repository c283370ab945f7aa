//! Universe — which instruments a scan covers.
//!
//! The universe is a benchmark index list plus sector lists, stored as TOML:
//!
//! ```toml
//! index = ["RELIANCE", "INFY", "HDFCBANK"]
//!
//! [sectors]
//! "NIFTY IT" = ["TCS", "INFY", "WIPRO"]
//! "NIFTY BANK" = ["ICICIBANK", "SBIN"]
//! ```
//!
//! Three scopes select from it: the index list, every sector, or the sectors
//! whose sector index gained most since the previous session.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradescan_core::Series;

/// Number of sectors kept by [`Scope::TopSectors`].
pub const TOP_SECTOR_COUNT: usize = 3;

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("failed to read universe file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse universe TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Which part of the universe to scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// The benchmark index constituents.
    Index,
    /// Every sector list, in sector-name order.
    AllSectors,
    /// The best-performing sectors by day-over-day change.
    TopSectors,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::AllSectors => "all-sectors",
            Self::TopSectors => "top-sectors",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "index" => Ok(Self::Index),
            "all-sectors" | "all" => Ok(Self::AllSectors),
            "top-sectors" | "top" => Ok(Self::TopSectors),
            other => Err(format!(
                "unknown scope '{other}' (expected index, all-sectors or top-sectors)"
            )),
        }
    }
}

/// One sector's move since the previous session, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorMove {
    pub sector: String,
    pub change_pct: f64,
}

/// Benchmark index list and sector lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Universe {
    #[serde(default)]
    pub index: Vec<String>,
    #[serde(default)]
    pub sectors: BTreeMap<String, Vec<String>>,
}

impl Universe {
    pub fn from_file(path: &Path) -> Result<Self, UniverseError> {
        let content = std::fs::read_to_string(path).map_err(|source| UniverseError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, UniverseError> {
        Ok(toml::from_str(content)?)
    }

    pub fn sector_names(&self) -> Vec<&str> {
        self.sectors.keys().map(String::as_str).collect()
    }

    /// Symbols for `scope`, first occurrence kept when lists overlap.
    ///
    /// `ranked` is only read for [`Scope::TopSectors`]: the first
    /// [`TOP_SECTOR_COUNT`] entries are taken, and a ranked sector missing
    /// from the universe contributes nothing.
    pub fn select(&self, scope: Scope, ranked: &[SectorMove]) -> Vec<String> {
        let lists: Vec<&[String]> = match scope {
            Scope::Index => vec![self.index.as_slice()],
            Scope::AllSectors => self.sectors.values().map(Vec::as_slice).collect(),
            Scope::TopSectors => ranked
                .iter()
                .take(TOP_SECTOR_COUNT)
                .filter_map(|m| self.sectors.get(&m.sector).map(Vec::as_slice))
                .collect(),
        };

        let mut out: Vec<String> = Vec::new();
        for symbol in lists.into_iter().flatten() {
            if !out.contains(symbol) {
                out.push(symbol.clone());
            }
        }
        out
    }

    /// NSE cash-market defaults: NIFTY 50 heavyweights and five sector lists.
    pub fn default_nse() -> Self {
        fn list(symbols: &[&str]) -> Vec<String> {
            symbols.iter().map(|s| s.to_string()).collect()
        }

        let mut sectors = BTreeMap::new();
        sectors.insert(
            "NIFTY BANK".into(),
            list(&["ICICIBANK", "KOTAKBANK", "SBIN", "AXISBANK", "HDFCBANK"]),
        );
        sectors.insert(
            "NIFTY IT".into(),
            list(&["TCS", "INFY", "HCLTECH", "TECHM", "WIPRO"]),
        );
        sectors.insert(
            "NIFTY FMCG".into(),
            list(&["ITC", "HINDUNILVR", "DABUR", "BRITANNIA", "MARICO"]),
        );
        sectors.insert(
            "NIFTY PHARMA".into(),
            list(&["SUNPHARMA", "CIPLA", "DIVISLAB", "DRREDDY", "AUROPHARMA"]),
        );
        sectors.insert(
            "NIFTY AUTO".into(),
            list(&["TATAMOTORS", "HEROMOTOCO", "BAJAJ-AUTO", "EICHERMOT", "MARUTI"]),
        );

        Self {
            index: list(&[
                "RELIANCE",
                "INFY",
                "HDFCBANK",
                "TCS",
                "ICICIBANK",
                "SBIN",
                "ITC",
                "HINDUNILVR",
            ]),
            sectors,
        }
    }
}

/// Percent change from the previous session's last close to the latest close.
///
/// The previous session is the last bar dated before the latest bar's
/// calendar date, so daily and intraday series both work. `None` when the
/// series covers a single date or the reference close is zero.
pub fn sector_change_pct(series: &Series) -> Option<f64> {
    let bars = series.bars();
    let last = bars.last()?;
    let today = last.timestamp.date();
    let previous = bars.iter().rev().find(|b| b.timestamp.date() < today)?;
    if previous.close == 0.0 {
        return None;
    }
    Some((last.close - previous.close) / previous.close * 100.0)
}

/// Sort sector moves by change, largest gain first. Ties keep name order.
pub fn rank_sectors(moves: impl IntoIterator<Item = SectorMove>) -> Vec<SectorMove> {
    let mut ranked: Vec<SectorMove> = moves.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.change_pct
            .total_cmp(&a.change_pct)
            .then_with(|| a.sector.cmp(&b.sector))
    });
    ranked
}
