//! Interest-distribution error types

use curve_math::MathError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum StakingError {
    #[error("invalid donation percentage: {0} ppm")]
    InvalidDonation(u64),

    #[error("exchange rate is zero")]
    InvalidRate,

    #[error("insufficient stake: requested {requested}, available {available}")]
    InsufficientBalance { requested: u128, available: u128 },

    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] MathError),
}

pub type Result<T> = std::result::Result<T, StakingError>;
