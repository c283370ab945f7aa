//! Simulation parameters.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::sizers::FixedRiskSizer;

/// Capital and risk fractions for the trade simulator.
///
/// Capital is fixed for the whole run: every trade is sized from the starting
/// capital, realized P&L is not compounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub capital: f64,
    pub risk_fraction: f64,
    pub sl_fraction: f64,
    pub tp_fraction: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            capital: 100_000.0,
            risk_fraction: 0.02,
            sl_fraction: 0.005,
            tp_fraction: 0.01,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.capital.is_finite() && self.capital > 0.0) {
            return Err(CoreError::InvalidParameter {
                name: "capital",
                value: self.capital,
            });
        }
        if !(self.risk_fraction > 0.0 && self.risk_fraction <= 1.0) {
            return Err(CoreError::InvalidParameter {
                name: "risk_fraction",
                value: self.risk_fraction,
            });
        }
        if !self.sl_fraction.is_finite() || self.sl_fraction <= 0.0 {
            return Err(CoreError::DegenerateSizing {
                stop_distance: self.sl_fraction,
            });
        }
        if self.sl_fraction >= 1.0 {
            return Err(CoreError::InvalidParameter {
                name: "sl_fraction",
                value: self.sl_fraction,
            });
        }
        if !(self.tp_fraction.is_finite() && self.tp_fraction >= 0.0) {
            return Err(CoreError::InvalidParameter {
                name: "tp_fraction",
                value: self.tp_fraction,
            });
        }
        Ok(())
    }

    pub fn sizer(&self) -> FixedRiskSizer {
        FixedRiskSizer::new(self.risk_fraction, self.sl_fraction)
    }

    pub fn target(&self, entry_price: f64) -> f64 {
        entry_price * (1.0 + self.tp_fraction)
    }
}
