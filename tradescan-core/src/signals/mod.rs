//! Signal classifier pipeline: series → indicator frame → one labeled record per bar.

pub mod classifier;
pub mod record;

pub use classifier::{classify, Signal, Thresholds};
pub use record::{latest_actionable, SignalCounts, SignalRecord};

use serde::{Deserialize, Serialize};

use crate::domain::Series;
use crate::error::CoreError;
use crate::indicators::{IndicatorFrame, IndicatorParams};

/// Everything that shapes the labels: indicator windows and RSI thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalParams {
    pub indicators: IndicatorParams,
    pub thresholds: Thresholds,
}

impl SignalParams {
    pub fn validate(&self) -> Result<(), CoreError> {
        self.indicators.validate()?;
        self.thresholds.validate()
    }
}

/// Label every bar of `series` with the default EMA 20/50, RSI 14, 55/45 rule.
pub fn compute_signals(series: &Series) -> Result<Vec<SignalRecord>, CoreError> {
    compute_signals_with(series, &SignalParams::default())
}

/// Label every bar of `series`.
///
/// Output has the series' length and order. Deterministic: the same series
/// and params always yield identical records.
pub fn compute_signals_with(
    series: &Series,
    params: &SignalParams,
) -> Result<Vec<SignalRecord>, CoreError> {
    params.thresholds.validate()?;
    let frame = IndicatorFrame::compute(series, &params.indicators)?;

    Ok(series
        .bars()
        .iter()
        .enumerate()
        .map(|(index, bar)| {
            let row = frame.row(index);
            SignalRecord {
                index,
                timestamp: bar.timestamp,
                close: bar.close,
                ema_fast: row.ema_fast,
                ema_slow: row.ema_slow,
                rsi: row.rsi,
                vwap: row.vwap,
                signal: classify(&row, &params.thresholds),
            }
        })
        .collect())
}
