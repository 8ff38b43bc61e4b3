//! Reserve orchestrator error types

use market_maker::MarketError;
use reserve_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ReserveError {
    #[error("unauthorized: caller {0}")]
    Unauthorized(String),

    #[error("asset not tradable through the reserve: {0}")]
    NotActive(String),

    #[error("reserve not initialized for asset: {0}")]
    ReserveNotInitialized(String),

    #[error("slippage exceeded: minimum {minimum}, actual {actual}")]
    SlippageExceeded { minimum: u128, actual: u128 },

    #[error("mint interval not elapsed: {remaining} seconds remaining")]
    IntervalNotElapsed { remaining: u64 },

    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: u128, available: u128 },

    #[error("caller is not whitelisted: {0}")]
    NotWhitelisted(String),

    #[error("reserve has been ended")]
    Ended,

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("market maker error: {0}")]
    Market(#[from] MarketError),

    #[error("token ledger error: {0}")]
    Token(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, ReserveError>;
