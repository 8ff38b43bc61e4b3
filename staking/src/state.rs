//! Ledger state records

use serde::{Deserialize, Serialize};

use reserve_core::Amount;

/// Global distribution state.
///
/// Invariant: `global_total_effective_stake <= global_total_stake`; the
/// effective total is `Σ stake_i · (1 − donation_i)` maintained
/// incrementally, never by re-walking stakers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalInterestState {
    pub global_total_stake: Amount,
    pub global_total_effective_stake: Amount,
    /// Wad-scaled accrued GD per unit of effective stake; monotonically
    /// non-decreasing.
    pub global_gd_yield_per_token: u128,
    pub gd_interest_earned_to_date: Amount,
    pub interest_token_earned_to_date: Amount,
    /// Interest-token units the pool currently holds.
    pub itoken_balance: Amount,
    /// GD booked to stakers and not yet withdrawn.
    pub interest_gd_balance: Amount,
    /// GD booked to UBI and not yet collected.
    pub ubi_gd_balance: Amount,
}

/// One depositor's position. Created on first stake, zeroed (never
/// deleted) on full withdrawal. Owned exclusively by the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakerRecord {
    pub total_stake: Amount,
    pub total_effective_stake: Amount,
    /// Wad-scaled yield offset: effective stake times the accumulator at
    /// settlement points, plus interest already paid out.
    pub gd_yield_rate_paid: u128,
    /// Accumulator snapshot at the staker's last interaction.
    pub last_share_per_token: u128,
    /// Lifetime GD interest paid to this staker.
    pub withdrawn_to_date: Amount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_serialize() {
        let global = GlobalInterestState {
            global_total_stake: 150,
            global_total_effective_stake: 105,
            ..Default::default()
        };
        let json = serde_json::to_string(&global).unwrap();
        let back: GlobalInterestState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, global);
    }
}
