//! Error taxonomy for the signal engine.

use thiserror::Error;

use crate::domain::BarError;

/// Errors surfaced by the indicator engine, the classifier pipeline and the
/// trade simulator.
///
/// Short history is never an error: indicators degrade to undefined values and
/// the classifier to HOLD. Only genuinely empty input, structurally invalid
/// bars and unusable sizing parameters are reported.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("insufficient data: series is empty")]
    InsufficientData,

    #[error("degenerate sizing: stop distance {stop_distance} is not positive")]
    DegenerateSizing { stop_distance: f64 },

    #[error("malformed bar at index {index}: {source}")]
    MalformedBar {
        index: usize,
        #[source]
        source: BarError,
    },

    #[error("signal records out of timestamp order at index {index}")]
    UnorderedRecords { index: usize },

    #[error("invalid parameter '{name}': {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}
