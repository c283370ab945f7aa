//! Cumulative Volume-Weighted Average Price (VWAP).
//!
//! VWAP[t] = sum(volume * typical) / sum(volume) over bars 0..=t,
//! typical = (high + low) / 2. Never reset mid-series.
//! Undefined until the first bar with non-zero volume; a zero-volume bar after
//! that leaves both sums unchanged, carrying the previous value forward.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone, Default)]
pub struct Vwap;

impl Vwap {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for Vwap {
    fn name(&self) -> &str {
        "vwap"
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let mut cum_pv = 0.0;
        let mut cum_volume = 0.0;
        bars.iter()
            .map(|bar| {
                let volume = bar.volume as f64;
                cum_pv += volume * bar.typical_price();
                cum_volume += volume;
                if cum_volume > 0.0 {
                    Some(cum_pv / cum_volume)
                } else {
                    None
                }
            })
            .collect()
    }
}
