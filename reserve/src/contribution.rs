//! Sell-side contribution policy collaborator
//!
//! The deduction applied to every sell payout before release. The policy
//! itself is external to the orchestrator; the percentage implementation
//! here is the default deployment shape.

use curve_math::mul_div_floor;
use reserve_core::constants::PPM_DENOM;
use reserve_core::Amount;

pub trait ContributionPolicy {
    /// Deduction to withhold from a sell payout of `reserve_out`.
    fn contribution(&self, reserve_out: Amount) -> Amount;
}

/// Flat parts-per-million deduction.
#[derive(Debug, Clone, Copy)]
pub struct PercentageContribution {
    ppm: u64,
}

impl PercentageContribution {
    pub fn new(ppm: u64) -> Self {
        Self {
            ppm: ppm.min(PPM_DENOM),
        }
    }

    pub fn ppm(&self) -> u64 {
        self.ppm
    }
}

impl ContributionPolicy for PercentageContribution {
    fn contribution(&self, reserve_out: Amount) -> Amount {
        // ppm is clamped to PPM_DENOM, so the wide product narrows back
        mul_div_floor(reserve_out, self.ppm as u128, PPM_DENOM as u128).unwrap_or(0)
    }
}
