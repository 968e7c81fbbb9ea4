//! Coin game, calculator and config types. Keep this crate free of IO and
//! platform concerns.

pub mod calc;
pub mod coins;
pub mod config;
pub mod error;
pub mod number;
pub mod solver;

pub use calc::*;
pub use coins::*;
pub use config::*;
pub use error::*;
pub use number::*;
pub use solver::*;
