//! Per-bar trend/momentum classification.
//!
//! BUY  when fast EMA > slow EMA and RSI > buy threshold.
//! SELL when fast EMA < slow EMA and RSI < sell threshold.
//! HOLD otherwise, including equal EMAs and any undefined input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::indicators::IndicatorRow;

/// Discrete per-bar label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }

    /// BUY or SELL.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Self::Hold)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Signal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            "HOLD" => Ok(Self::Hold),
            other => Err(format!("unknown signal '{other}'")),
        }
    }
}

/// RSI levels gating BUY and SELL. Defaults: 55 / 45.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    pub buy_rsi: f64,
    pub sell_rsi: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            buy_rsi: 55.0,
            sell_rsi: 45.0,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, value) in [("buy_rsi", self.buy_rsi), ("sell_rsi", self.sell_rsi)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(CoreError::InvalidParameter { name, value });
            }
        }
        if self.sell_rsi > self.buy_rsi {
            return Err(CoreError::InvalidParameter {
                name: "sell_rsi",
                value: self.sell_rsi,
            });
        }
        Ok(())
    }
}

/// Classify one bar from its indicator row.
///
/// Depends on nothing but the row, so the series can be labeled in any order.
pub fn classify(row: &IndicatorRow, thresholds: &Thresholds) -> Signal {
    let (Some(fast), Some(slow), Some(rsi)) = (row.ema_fast, row.ema_slow, row.rsi) else {
        return Signal::Hold;
    };

    if fast > slow && rsi > thresholds.buy_rsi {
        Signal::Buy
    } else if fast < slow && rsi < thresholds.sell_rsi {
        Signal::Sell
    } else {
        Signal::Hold
    }
}
