//! IndicatorFrame — the classifier's indicator columns, aligned 1:1 with a series.

use serde::{Deserialize, Serialize};

use super::{Ema, Indicator, Rsi, Vwap};
use crate::domain::Series;
use crate::error::CoreError;

/// Indicator windows. Defaults: EMA 20 / EMA 50 / RSI 14.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndicatorParams {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub rsi_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ema_fast: 20,
            ema_slow: 50,
            rsi_period: 14,
        }
    }
}

impl IndicatorParams {
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, period) in [
            ("ema_fast", self.ema_fast),
            ("ema_slow", self.ema_slow),
            ("rsi_period", self.rsi_period),
        ] {
            if period == 0 {
                return Err(CoreError::InvalidParameter { name, value: 0.0 });
            }
        }
        Ok(())
    }
}

/// Indicator values for one bar. `None` marks an undefined (warm-up) value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub rsi: Option<f64>,
    pub vwap: Option<f64>,
}

/// Parallel indicator columns; every column has the series' length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    pub ema_fast: Vec<Option<f64>>,
    pub ema_slow: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub vwap: Vec<Option<f64>>,
}

impl IndicatorFrame {
    /// Compute all columns. Fails only for an empty series; short series
    /// yield undefined RSI values instead of an error.
    pub fn compute(series: &Series, params: &IndicatorParams) -> Result<Self, CoreError> {
        if series.is_empty() {
            return Err(CoreError::InsufficientData);
        }
        params.validate()?;

        let bars = series.bars();
        Ok(Self {
            ema_fast: Ema::new(params.ema_fast).compute(bars),
            ema_slow: Ema::new(params.ema_slow).compute(bars),
            rsi: Rsi::new(params.rsi_period).compute(bars),
            vwap: Vwap::new().compute(bars),
        })
    }

    pub fn len(&self) -> usize {
        self.ema_fast.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ema_fast.is_empty()
    }

    /// Row view at `index`. Out-of-range indices yield an all-undefined row.
    pub fn row(&self, index: usize) -> IndicatorRow {
        let at = |column: &[Option<f64>]| column.get(index).copied().flatten();
        IndicatorRow {
            ema_fast: at(&self.ema_fast),
            ema_slow: at(&self.ema_slow),
            rsi: at(&self.rsi),
            vwap: at(&self.vwap),
        }
    }
}
