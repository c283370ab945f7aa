//! Indicator engine.
//!
//! Indicators are pure functions: bar history in, one value per bar out.
//! Warm-up bars that lack enough history produce `None`, never NaN or zero,
//! so an undefined value cannot leak into a comparison downstream.
//!
//! [`IndicatorFrame`] runs the fixed set used by the classifier (fast EMA,
//! slow EMA, RSI, VWAP) over a [`Series`](crate::domain::Series).

pub mod ema;
pub mod frame;
pub mod rsi;
pub mod vwap;

pub use ema::Ema;
pub use frame::{IndicatorFrame, IndicatorParams, IndicatorRow};
pub use rsi::Rsi;
pub use vwap::Vwap;

use crate::domain::Bar;

/// Trait for indicators.
///
/// # Look-ahead contamination guard
/// No value at bar t may depend on bar t+1 or later. Computing over a
/// truncated series must reproduce the prefix of the full-series output.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ema_20", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading bars whose output is `None`.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    ///
    /// Returns a vector of the same length as `bars`.
    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>>;
}

/// Create synthetic 5-minute bars from close prices for testing.
///
/// open = prev_close (or close for the first bar), high/low = max/min of
/// open and close widened by 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let session_open = chrono::NaiveDate::from_ymd_opt(2025, 8, 22)
        .unwrap()
        .and_hms_opt(9, 15, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: session_open + chrono::Duration::minutes(5 * i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
