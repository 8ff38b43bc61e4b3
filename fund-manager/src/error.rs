//! Fund manager error types

use reserve::ReserveError;
use reserve_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FundError {
    #[error("unauthorized: caller {0}")]
    Unauthorized(String),

    #[error("source not whitelisted: {0}")]
    NotWhitelisted(String),

    #[error("collection interval not elapsed: {remaining} seconds remaining")]
    IntervalNotElapsed { remaining: u64 },

    #[error("a collection is already in progress")]
    Collecting,

    #[error("reserve error: {0}")]
    Reserve(#[from] ReserveError),

    #[error("token ledger error: {0}")]
    Token(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, FundError>;
