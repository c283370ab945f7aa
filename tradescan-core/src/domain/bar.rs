//! Bar — one intraday OHLCV observation.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structural problems found while validating bars.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BarError {
    #[error("{field} price {value} is not positive")]
    NonPositivePrice { field: &'static str, value: f64 },

    #[error("{field} price is not finite")]
    NonFinitePrice { field: &'static str },

    #[error("high {high} is below low {low}")]
    InvertedRange { high: f64, low: f64 },

    #[error("volume {0} is negative")]
    NegativeVolume(i64),

    #[error("timestamp {current} does not follow {previous}")]
    NonMonotonicTimestamp {
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },
}

/// OHLCV bar at a single timestamp.
///
/// Fields are public for read access; construct through [`Bar::try_new`] when
/// the values come from outside the process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Build a bar, rejecting non-finite or non-positive prices, an inverted
    /// high/low range and negative volume.
    pub fn try_new(
        timestamp: NaiveDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: i64,
    ) -> Result<Self, BarError> {
        if volume < 0 {
            return Err(BarError::NegativeVolume(volume));
        }
        let bar = Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume: volume as u64,
        };
        bar.validate()?;
        Ok(bar)
    }

    /// Check the price fields of an already-built bar.
    pub fn validate(&self) -> Result<(), BarError> {
        for (field, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !value.is_finite() {
                return Err(BarError::NonFinitePrice { field });
            }
            if value <= 0.0 {
                return Err(BarError::NonPositivePrice { field, value });
            }
        }
        if self.high < self.low {
            return Err(BarError::InvertedRange {
                high: self.high,
                low: self.low,
            });
        }
        Ok(())
    }

    /// Midpoint of the bar's range, the price VWAP weights by volume.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low) / 2.0
    }
}
