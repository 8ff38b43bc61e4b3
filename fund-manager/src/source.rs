//! Interest-bearing deposit source interface

use reserve_core::{Address, Amount, TokenLedger};

/// An external yield-generating wrapper (e.g. a staking pool over a
/// lending protocol) the fund manager can harvest.
pub trait InterestSource {
    /// Accrued `(interest, principal_delta)` in reserve-asset units,
    /// without collecting.
    fn current_yield(&self) -> (Amount, Amount);

    /// Collect the accrued yield: transfer it to `to` on the given
    /// reserve-asset ledger and return `(interest, principal_delta)`.
    fn collect(
        &mut self,
        reserve_asset: &mut dyn TokenLedger,
        to: &Address,
    ) -> reserve_core::Result<(Amount, Amount)>;
}
