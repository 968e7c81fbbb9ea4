use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Threshold must be a number greater than 0.")]
pub struct ThresholdError {
    pub input: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoinInputError {
    #[error("Enter at least one valid coin value.")]
    NoCoins,
    #[error(transparent)]
    Threshold(#[from] ThresholdError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("Enter a math expression to continue.")]
    Empty,
    #[error("Only numbers and operators (+ - * / % . parentheses) are allowed.")]
    DisallowedCharacters,
    #[error("Invalid expression. Check your syntax.")]
    Syntax,
    #[error("Expression did not resolve to a finite number.")]
    NotFinite,
}
