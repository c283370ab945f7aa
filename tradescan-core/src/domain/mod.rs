//! Domain types for the signal engine

pub mod bar;
pub mod series;
pub mod trade;

pub use bar::{Bar, BarError};
pub use series::Series;
pub use trade::{Trade, TradeLog};
