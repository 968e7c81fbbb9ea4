use crate::{coerce_number, compute_coin_operations_with, CoinGameResult, CoinInputError};
use crate::{SolverLimits, ThresholdError};
use serde::{Deserialize, Serialize};

/// Splits a comma separated coin list. Tokens that are not finite,
/// non-negative numbers are dropped without complaint.
pub fn parse_coins_input(input: &str) -> Vec<f64> {
    if input.is_empty() {
        return Vec::new();
    }
    input
        .split(',')
        .filter_map(coerce_number)
        .filter(|value| value.is_finite() && *value >= 0.0)
        .collect()
}

pub fn parse_threshold(input: &str) -> Result<f64, ThresholdError> {
    match coerce_number(input) {
        Some(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(ThresholdError {
            input: input.to_string(),
        }),
    }
}

/// A validated coin game: at least one coin and a positive threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinGameRequest {
    pub coins: Vec<f64>,
    pub threshold: f64,
}

impl CoinGameRequest {
    /// Parses both form fields. An empty coin list is reported before the
    /// threshold is looked at.
    pub fn parse(coins_text: &str, threshold_text: &str) -> Result<Self, CoinInputError> {
        let coins = parse_coins_input(coins_text);
        if coins.is_empty() {
            return Err(CoinInputError::NoCoins);
        }
        let threshold = parse_threshold(threshold_text)?;
        Ok(Self { coins, threshold })
    }

    pub fn solve(&self, limits: SolverLimits) -> CoinGameResult {
        compute_coin_operations_with(&self.coins, self.threshold, limits)
    }
}
