//! Pro-rata interest-distribution ledger
//!
//! Tracks global and per-staker effective stake and an accumulated
//! yield-per-effective-token figure, so stake, withdraw, and collect all
//! run in O(1) regardless of staker count. Donated percentages reduce a
//! staker's effective stake; the donated yield flows to UBI.

pub mod error;
pub mod ledger;
pub mod oracle;
pub mod state;

pub use error::{Result, StakingError};
pub use ledger::{InterestLedger, Settlement, UbiCollection};
pub use oracle::{ExchangeRateOracle, FixedRateOracle};
pub use state::{GlobalInterestState, StakerRecord};
