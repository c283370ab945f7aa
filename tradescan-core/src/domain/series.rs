//! Series — a validated, timestamp-ordered run of bars for one instrument.

use serde::Serialize;

use super::bar::{Bar, BarError};
use crate::error::CoreError;

/// Ordered bars for a single instrument.
///
/// Invariants (checked by [`Series::new`]):
/// - every bar passes [`Bar::validate`]
/// - timestamps strictly increase (no duplicates, never reordered; gaps allowed)
///
/// The bar vector is private so a series cannot be mutated after handoff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    symbol: String,
    bars: Vec<Bar>,
}

impl Series {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, CoreError> {
        for (index, bar) in bars.iter().enumerate() {
            bar.validate()
                .map_err(|source| CoreError::MalformedBar { index, source })?;
            if index > 0 {
                let previous = bars[index - 1].timestamp;
                if bar.timestamp <= previous {
                    return Err(CoreError::MalformedBar {
                        index,
                        source: BarError::NonMonotonicTimestamp {
                            previous,
                            current: bar.timestamp,
                        },
                    });
                }
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn at(minute: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 22)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap()
            + Duration::minutes(minute)
    }

    fn bar(minute: i64, close: f64) -> Bar {
        Bar {
            timestamp: at(minute),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn accepts_gapped_ascending_series() {
        let series = Series::new("RELIANCE", vec![bar(0, 100.0), bar(5, 101.0), bar(30, 99.0)])
            .unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.symbol(), "RELIANCE");
        assert_eq!(series.closes(), vec![100.0, 101.0, 99.0]);
    }

    #[test]
    fn empty_series_is_constructible() {
        let series = Series::new("INFY", Vec::new()).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn duplicate_timestamp_rejected() {
        let err = Series::new("TCS", vec![bar(0, 100.0), bar(0, 101.0)]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::MalformedBar {
                index: 1,
                source: BarError::NonMonotonicTimestamp { .. }
            }
        ));
    }

    #[test]
    fn reordered_timestamps_rejected() {
        let err = Series::new("TCS", vec![bar(10, 100.0), bar(5, 101.0)]).unwrap_err();
        assert!(matches!(err, CoreError::MalformedBar { index: 1, .. }));
    }

    #[test]
    fn bad_price_reports_index() {
        let mut bad = bar(5, 101.0);
        bad.close = -3.0;
        let err = Series::new("SBIN", vec![bar(0, 100.0), bad]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::MalformedBar {
                index: 1,
                source: BarError::NonPositivePrice { field: "close", .. }
            }
        ));
    }
}
