use serde::{Deserialize, Serialize};
use tcghub_core::{compare_coins, format_number, CoinGameResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReplayStatus {
    AlreadySolved,
    NotEnoughCoins,
    ThresholdReached,
    Unreachable,
}

impl ReplayStatus {
    pub fn from_result(result: &CoinGameResult) -> Self {
        match (result.steps.is_empty(), result.success) {
            (true, true) => Self::AlreadySolved,
            (true, false) => Self::NotEnoughCoins,
            (false, true) => Self::ThresholdReached,
            (false, false) => Self::Unreachable,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::AlreadySolved => "All coins already meet the threshold.",
            Self::NotEnoughCoins => "Not enough coins to reach the threshold.",
            Self::ThresholdReached => "Threshold reached!",
            Self::Unreachable => "Unable to reach threshold with the provided coins.",
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::AlreadySolved | Self::ThresholdReached)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayFrame {
    /// 1-based operation number.
    pub index: u32,
    pub x: f64,
    pub y: f64,
    pub new_coin: f64,
}

impl ReplayFrame {
    pub fn message(&self) -> String {
        format!(
            "Operation {}: Combined {} and {} to create {}",
            self.index,
            format_number(self.x),
            format_number(self.y),
            format_number(self.new_coin)
        )
    }
}

/// The coin list the hub showed between steps: each merge sorts it
/// ascending, takes the two smallest and appends the merged coin.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoinBoard {
    coins: Vec<f64>,
}

impl CoinBoard {
    pub fn new(coins: &[f64]) -> Self {
        Self {
            coins: coins.to_vec(),
        }
    }

    pub fn coins(&self) -> &[f64] {
        &self.coins
    }

    /// Returns the two coins taken, or `None` when fewer than two remain.
    pub fn merge(&mut self, new_coin: f64) -> Option<(f64, f64)> {
        // Stable and adaptive: after the first round the list is sorted
        // apart from the appended coin.
        self.coins.sort_by(|a, b| compare_coins(*a, *b));
        if self.coins.len() < 2 {
            return None;
        }
        let taken = (self.coins[0], self.coins[1]);
        self.coins.drain(..2);
        self.coins.push(new_coin);
        Some(taken)
    }

    pub fn into_coins(self) -> Vec<f64> {
        self.coins
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Replay {
    pub threshold: f64,
    pub initial_coins: Vec<f64>,
    pub operations: u32,
    pub status: ReplayStatus,
    pub frames: Vec<ReplayFrame>,
}

impl Replay {
    pub fn summary(&self) -> String {
        format!("Minimum operations required: {}", self.operations)
    }

    pub fn board(&self) -> CoinBoard {
        CoinBoard::new(&self.initial_coins)
    }

    /// Coins on the board after the last frame.
    pub fn final_coins(&self) -> Vec<f64> {
        let mut board = self.board();
        for frame in &self.frames {
            board.merge(frame.new_coin);
        }
        board.into_coins()
    }
}

/// Replays the step log over the caller's coins the way the hub animated it.
/// Frames record only the coins taken and the merged coin; the list between
/// steps is rebuilt with a [`CoinBoard`].
pub fn build_replay(initial_coins: &[f64], threshold: f64, result: &CoinGameResult) -> Replay {
    let mut board = CoinBoard::new(initial_coins);
    let mut frames = Vec::with_capacity(result.steps.len());
    for (index, step) in result.steps.iter().enumerate() {
        let Some((x, y)) = board.merge(step.new_coin) else {
            break;
        };
        frames.push(ReplayFrame {
            index: index as u32 + 1,
            x,
            y,
            new_coin: step.new_coin,
        });
    }
    Replay {
        threshold,
        initial_coins: initial_coins.to_vec(),
        operations: result.operations,
        status: ReplayStatus::from_result(result),
        frames,
    }
}
