//! Step-by-step replay of solved coin games, with pacing and reports.

mod config;
mod error;
mod player;
mod replay;
mod trace;

pub use config::*;
pub use error::*;
pub use player::*;
pub use replay::*;
pub use trace::*;
