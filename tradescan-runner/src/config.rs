//! TOML run configuration.
//!
//! ```toml
//! [simulation]
//! capital = 100000.0
//! risk_fraction = 0.02
//! sl_fraction = 0.005
//! tp_fraction = 0.01
//!
//! [indicators]
//! ema_fast = 20
//! ema_slow = 50
//! rsi_period = 14
//!
//! [classifier]
//! buy_rsi = 55.0
//! sell_rsi = 45.0
//!
//! [scan]
//! max_price = 1500.0
//! live_mode = false
//! ```
//!
//! Every section and key is optional; missing values take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradescan_core::indicators::IndicatorParams;
use tradescan_core::signals::Thresholds;
use tradescan_core::{CoreError, SignalParams, SimulationConfig};

/// Errors from loading or validating a [`ScanConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(#[from] CoreError),

    #[error("invalid config: ema_fast ({fast}) must be shorter than ema_slow ({slow})")]
    EmaOrder { fast: usize, slow: usize },

    #[error("invalid config: max_price must be positive, got {0}")]
    MaxPrice(f64),
}

/// Scan-view options. None of these change signals or trades.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanSection {
    /// Only list actionable instruments whose last close is below this.
    pub max_price: Option<f64>,
    /// Informational flag for whoever consumes the signals. The engine never
    /// places orders and does not read it.
    pub live_mode: bool,
}

/// Complete configuration for a signals/simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    pub simulation: SimulationConfig,
    pub indicators: IndicatorParams,
    pub classifier: Thresholds,
    pub scan: ScanSection,
}

impl ScanConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.signal_params().validate()?;
        if self.indicators.ema_fast >= self.indicators.ema_slow {
            return Err(ConfigError::EmaOrder {
                fast: self.indicators.ema_fast,
                slow: self.indicators.ema_slow,
            });
        }
        self.simulation.validate()?;
        if let Some(p) = self.scan.max_price {
            if !(p.is_finite() && p > 0.0) {
                return Err(ConfigError::MaxPrice(p));
            }
        }
        Ok(())
    }

    /// Indicator windows and thresholds as the core consumes them.
    pub fn signal_params(&self) -> SignalParams {
        SignalParams {
            indicators: self.indicators,
            thresholds: self.classifier,
        }
    }

    /// Deterministic BLAKE3 hex digest of the canonical JSON form.
    ///
    /// Two runs with identical configs share a fingerprint.
    pub fn fingerprint(&self) -> String {
        // Plain numeric structs: serialization cannot fail.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
