//! Fixed-fractional risk sizer
//!
//! Risk a fixed fraction of capital per trade with the stop a fixed fraction
//! below entry.

use crate::error::CoreError;

/// Fixed-fractional risk sizer
///
/// # Formula
/// ```text
/// risk_amount   = capital * risk_fraction
/// stop_distance = entry_price * sl_fraction
/// quantity      = floor(risk_amount / stop_distance)
/// ```
///
/// # Example
/// - Capital: 100,000
/// - Risk per trade: 2% (2,000)
/// - Entry: 100.00, stop 0.5% below (distance 0.50)
/// - Quantity: 2,000 / 0.50 = 4,000 shares
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRiskSizer {
    /// Fraction of capital risked per trade (e.g., 0.02 = 2%)
    risk_fraction: f64,

    /// Stop-loss distance as a fraction of entry (e.g., 0.005 = 0.5%)
    sl_fraction: f64,
}

impl FixedRiskSizer {
    pub fn new(risk_fraction: f64, sl_fraction: f64) -> Self {
        Self {
            risk_fraction,
            sl_fraction,
        }
    }

    pub fn risk_amount(&self, capital: f64) -> f64 {
        capital * self.risk_fraction
    }

    /// |entry - stop_loss|, taken directly as entry * sl_fraction rather than
    /// by subtracting the two prices.
    pub fn stop_distance(&self, entry_price: f64) -> f64 {
        (entry_price * self.sl_fraction).abs()
    }

    pub fn stop_loss(&self, entry_price: f64) -> f64 {
        entry_price * (1.0 - self.sl_fraction)
    }

    /// Whole shares whose stop-out loses at most the risk budget.
    ///
    /// A zero or negative stop distance is a `DegenerateSizing` error. A budget
    /// smaller than one share's stop distance yields 0.
    pub fn quantity(&self, capital: f64, entry_price: f64) -> Result<u64, CoreError> {
        if self.sl_fraction <= 0.0 {
            return Err(CoreError::DegenerateSizing { stop_distance: 0.0 });
        }
        let stop_distance = self.stop_distance(entry_price);
        if !(stop_distance.is_finite() && stop_distance > 0.0) {
            return Err(CoreError::DegenerateSizing { stop_distance });
        }

        let raw = self.risk_amount(capital) / stop_distance;
        if !raw.is_finite() || raw <= 0.0 {
            return Ok(0);
        }
        // f64 → u64 `as` saturates at u64::MAX.
        Ok(raw.floor() as u64)
    }
}
