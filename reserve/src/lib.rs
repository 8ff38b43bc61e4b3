//! Reserve orchestrator
//!
//! Public buy/sell entry points over the bonding-curve market maker, the
//! periodic interest-and-UBI mint, the sell-side contribution deduction,
//! and the authorized teardown path.

pub mod contribution;
pub mod error;
pub mod orchestrator;

pub use contribution::{ContributionPolicy, PercentageContribution};
pub use error::{ReserveError, Result};
pub use orchestrator::{InterestMintOutcome, Reserve};
