//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1).
//! Seed: EMA[0] = close[0] (no simple-average seed, no warm-up gap).
//! Lookback: 0.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_of_series(&closes, self.period)
            .into_iter()
            .map(Some)
            .collect()
    }
}

/// Compute raw EMA values from a pre-extracted f64 slice.
///
/// Every output is defined; an empty input yields an empty output.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let alpha = 2.0 / (period.max(1) as f64 + 1.0);
    let mut result = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &v in values {
        let ema = match prev {
            None => v,
            Some(p) => alpha * v + (1.0 - alpha) * p,
        };
        result.push(ema);
        prev = Some(ema);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn ema_period_1_equals_close() {
        let bars = make_bars(&[100.0, 200.0, 300.0]);
        let result = Ema::new(1).compute(&bars);
        assert_eq!(result, vec![Some(100.0), Some(200.0), Some(300.0)]);
    }

    #[test]
    fn ema_3_known_values() {
        // Closes: 10, 12, 14, 13
        // alpha = 2/(3+1) = 0.5
        // EMA[0] = 10
        // EMA[1] = 0.5*12 + 0.5*10 = 11
        // EMA[2] = 0.5*14 + 0.5*11 = 12.5
        // EMA[3] = 0.5*13 + 0.5*12.5 = 12.75
        let bars = make_bars(&[10.0, 12.0, 14.0, 13.0]);
        let result = Ema::new(3).compute(&bars);
        let expected = [10.0, 11.0, 12.5, 12.75];
        for (got, want) in result.iter().zip(expected) {
            assert_approx(got.unwrap(), want, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn ema_seeds_at_first_close_for_any_period() {
        let bars = make_bars(&[250.0]);
        assert_eq!(Ema::new(20).compute(&bars), vec![Some(250.0)]);
        assert_eq!(Ema::new(50).compute(&bars), vec![Some(250.0)]);
    }

    #[test]
    fn ema_constant_series_stays_constant() {
        let bars = make_bars(&[42.0; 30]);
        for v in Ema::new(20).compute(&bars) {
            assert_approx(v.unwrap(), 42.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn ema_lookback_is_zero() {
        assert_eq!(Ema::new(20).lookback(), 0);
        assert_eq!(Ema::new(50).name(), "ema_50");
    }

    #[test]
    fn ema_of_series_matches_indicator() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let indicator_result = Ema::new(3).compute(&bars);
        let series_result = ema_of_series(&closes, 3);
        for i in 0..6 {
            assert_approx(indicator_result[i].unwrap(), series_result[i], DEFAULT_EPSILON);
        }
    }

    #[test]
    fn ema_empty_input() {
        assert!(ema_of_series(&[], 20).is_empty());
    }
}
