use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use tracing::{debug, warn};

pub const DEFAULT_MAX_OPERATIONS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverLimits {
    /// The solver stops once the operation count exceeds this value.
    pub max_operations: u32,
}

impl Default for SolverLimits {
    fn default() -> Self {
        Self {
            max_operations: DEFAULT_MAX_OPERATIONS,
        }
    }
}

/// One merge: the two smallest coins `x <= y` were replaced by `new_coin`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeStep {
    pub x: f64,
    pub y: f64,
    pub new_coin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinGameResult {
    pub operations: u32,
    pub steps: Vec<MergeStep>,
    pub final_coins: Vec<f64>,
    pub success: bool,
}

/// The smaller coin counts double: `merge_value(3, 5) == 11`.
pub fn merge_value(x: f64, y: f64) -> f64 {
    if x <= y {
        x * 2.0 + y
    } else {
        y * 2.0 + x
    }
}

/// Ascending coin order used for every merge decision. `-0` and `0` compare
/// equal so input order decides between them; NaN sorts by IEEE total order.
pub fn compare_coins(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

pub fn compute_coin_operations(coins: &[f64], threshold: f64) -> CoinGameResult {
    compute_coin_operations_with(coins, threshold, SolverLimits::default())
}

/// Greedily merges the two smallest coins until every coin reaches
/// `threshold`, a single coin is left, or the operation cap is exceeded.
///
/// Coins are extracted by `(value, seq)`: input coins are numbered in input
/// order and every merged coin after all earlier ones, which picks the same
/// coins as a stable ascending sort of the working list each round.
/// `final_coins` is the input order when nothing merged, otherwise the
/// remaining coins ascending followed by the last merged coin.
pub fn compute_coin_operations_with(
    coins: &[f64],
    threshold: f64,
    limits: SolverLimits,
) -> CoinGameResult {
    if coins.is_empty() {
        return CoinGameResult {
            operations: 0,
            steps: Vec::new(),
            final_coins: Vec::new(),
            success: false,
        };
    }

    let mut working: BinaryHeap<Reverse<WorkingCoin>> = coins
        .iter()
        .enumerate()
        .map(|(seq, value)| Reverse(WorkingCoin { value: *value, seq }))
        .collect();
    let mut below = coins.iter().filter(|value| **value < threshold).count();
    let mut next_seq = coins.len();
    let mut last_merged = None;
    let mut operations = 0u32;
    let mut steps = Vec::new();

    while working.len() > 1 && below > 0 {
        let (Some(Reverse(first)), Some(Reverse(second))) = (working.pop(), working.pop()) else {
            break;
        };
        for coin in [&first, &second] {
            if coin.value < threshold {
                below -= 1;
            }
        }
        let new_coin = merge_value(first.value, second.value);
        operations += 1;
        steps.push(MergeStep {
            x: first.value,
            y: second.value,
            new_coin,
        });
        if new_coin < threshold {
            below += 1;
        }
        working.push(Reverse(WorkingCoin {
            value: new_coin,
            seq: next_seq,
        }));
        last_merged = Some(next_seq);
        next_seq += 1;

        if operations > limits.max_operations {
            warn!(
                operations,
                max_operations = limits.max_operations,
                "coin merge stopped at operation cap"
            );
            break;
        }
    }

    let final_coins = match last_merged {
        None => coins.to_vec(),
        Some(last) => {
            let mut rest: Vec<WorkingCoin> =
                working.into_iter().map(|Reverse(coin)| coin).collect();
            rest.sort();
            let mut ordered: Vec<f64> = Vec::with_capacity(rest.len());
            let mut tail = None;
            for coin in rest {
                if coin.seq == last {
                    tail = Some(coin.value);
                } else {
                    ordered.push(coin.value);
                }
            }
            ordered.extend(tail);
            ordered
        }
    };
    let success = !final_coins.is_empty() && final_coins.iter().all(|value| *value >= threshold);
    debug!(
        coins = coins.len(),
        threshold,
        operations,
        success,
        "coin merge finished"
    );

    CoinGameResult {
        operations,
        steps,
        final_coins,
        success,
    }
}

#[derive(Debug, Clone, Copy)]
struct WorkingCoin {
    value: f64,
    seq: usize,
}

impl PartialEq for WorkingCoin {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for WorkingCoin {}

impl PartialOrd for WorkingCoin {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WorkingCoin {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_coins(self.value, other.value).then_with(|| self.seq.cmp(&other.seq))
    }
}
