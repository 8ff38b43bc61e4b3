//! Bonding-curve market maker
//!
//! Owns, per reserve asset, the `(gd_supply, reserve_supply, reserve_ratio)`
//! triple and prices buys and sells with the Bancor formula. Ordinary trades
//! move supply and reserve along the curve and never touch the ratio; the
//! ratio only moves through the daily expansion schedule, paired with a
//! price-preserving supply mint.

pub mod error;
pub mod ledger;
pub mod token;

pub use error::{MarketError, Result};
pub use ledger::MarketMaker;
pub use token::ReserveToken;
