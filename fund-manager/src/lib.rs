//! Interest harvesting loop
//!
//! Iterates whitelisted interest-bearing deposit sources on an interval
//! gate, pulls accrued yield, and forwards it to the reserve's periodic
//! interest-and-UBI mint. Sole writer of the last-collection marker.

pub mod error;
pub mod manager;
pub mod source;

pub use error::{FundError, Result};
pub use manager::{FundManager, FundManagerConfig, HarvestOutcome};
pub use source::InterestSource;
