use crate::{Replay, ReplayConfig, ReplayError, ReplayFrame, ReplayStatus};
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Receives a replay as it is played back. An error from any call stops
/// playback.
pub trait ReplaySink {
    fn show_coins(&mut self, coins: &[f64]) -> Result<(), ReplayError>;
    fn log_step(&mut self, frame: &ReplayFrame) -> Result<(), ReplayError>;
    fn finish(&mut self, status: ReplayStatus, summary: &str) -> Result<(), ReplayError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReplayEvent {
    Coins(Vec<f64>),
    Step(ReplayFrame),
    Finished { status: ReplayStatus, summary: String },
}

impl ReplaySink for Vec<ReplayEvent> {
    fn show_coins(&mut self, coins: &[f64]) -> Result<(), ReplayError> {
        self.push(ReplayEvent::Coins(coins.to_vec()));
        Ok(())
    }

    fn log_step(&mut self, frame: &ReplayFrame) -> Result<(), ReplayError> {
        self.push(ReplayEvent::Step(*frame));
        Ok(())
    }

    fn finish(&mut self, status: ReplayStatus, summary: &str) -> Result<(), ReplayError> {
        self.push(ReplayEvent::Finished {
            status,
            summary: summary.to_string(),
        });
        Ok(())
    }
}

/// Shows the starting coins, then each logged step followed by a pause and
/// the coins after it, then the outcome.
pub fn play<S: ReplaySink>(
    replay: &Replay,
    config: &ReplayConfig,
    sink: &mut S,
) -> Result<(), ReplayError> {
    let delay = Duration::from_millis(config.step_delay_ms);
    let mut board = replay.board();
    sink.show_coins(board.coins())?;
    for frame in &replay.frames {
        sink.log_step(frame)?;
        debug!(index = frame.index, delay_ms = config.step_delay_ms, "replay step");
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        board.merge(frame.new_coin);
        sink.show_coins(board.coins())?;
    }
    sink.finish(replay.status, &replay.summary())
}
