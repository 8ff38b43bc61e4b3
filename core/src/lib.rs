//! GD Reserve shared foundation
//!
//! Common vocabulary used by every ledger crate:
//! - Monetary `Amount` and principal `Address` types
//! - Injected `Clock` for all interval gates
//! - `AuthorizationContext` for controller-gated operations
//! - `TokenLedger` collaborator trait plus an in-process implementation
//! - `Whitelist` collaborator trait

pub mod auth;
pub mod clock;
pub mod error;
pub mod token;
pub mod whitelist;

pub use auth::AuthorizationContext;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, Result};
pub use token::{MemoryToken, TokenLedger};
pub use whitelist::{OpenWhitelist, StaticWhitelist, Whitelist};

/// Monetary amount in a token's base units.
pub type Amount = u128;

/// Principal identifier (account or contract).
pub type Address = String;

/// Shared numeric constants.
pub mod constants {
    /// Parts-per-million denominator for ratios and percentages.
    pub const PPM_DENOM: u64 = 1_000_000;

    /// GD token precision (2 decimal places).
    pub const GD_DECIMALS: u32 = 2;

    /// Seconds in one expansion day.
    pub const SECONDS_PER_DAY: u64 = 86_400;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(constants::PPM_DENOM, 1_000_000);
        assert_eq!(constants::SECONDS_PER_DAY, 86_400);
    }
}
