//! Market maker error types

use curve_math::MathError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum MarketError {
    #[error("unauthorized: caller {0} is not the controller")]
    Unauthorized(String),

    #[error("reserve token not initialized: {0}")]
    NotInitialized(String),

    #[error("reserve token not active: {0}")]
    NotActive(String),

    #[error("insufficient supply: requested {requested}, available {available}")]
    InsufficientSupply { requested: u128, available: u128 },

    #[error("expansion interval not elapsed: {remaining} seconds remaining")]
    IntervalNotElapsed { remaining: u64 },

    #[error("invalid reserve ratio: {0} ppm")]
    InvalidRatio(u64),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("token already initialized: {0}")]
    AlreadyInitialized(String),

    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] MathError),
}

pub type Result<T> = std::result::Result<T, MarketError>;
