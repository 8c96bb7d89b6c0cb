//! Profit/loss aggregation and the reports built on it

pub mod charts;
pub mod export;
pub mod profit_loss;

pub use charts::*;
pub use export::*;
pub use profit_loss::*;
