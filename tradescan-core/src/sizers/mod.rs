//! Position sizing — translate a risk budget into a share quantity.
//!
//! Sizers do NOT decide entry/exit (that's the classifier's job) and hold no
//! state between trades.

pub mod fixed_risk;

pub use fixed_risk::FixedRiskSizer;
