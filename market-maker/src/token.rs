//! Per-asset reserve token record

use serde::{Deserialize, Serialize};

use reserve_core::constants::PPM_DENOM;
use reserve_core::Amount;

/// Curve state for one reserve asset.
///
/// `reserve_ratio_ppm` stays within `(0, 1_000_000]`; supplies only move
/// through the ledger's buy/sell/mint operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveToken {
    pub gd_supply: Amount,
    pub reserve_supply: Amount,
    pub reserve_ratio_ppm: u64,
    /// Base-unit decimals of the reserve asset, kept alongside the record so
    /// cross-precision price reporting is explicit rather than implied.
    pub reserve_decimals: u32,
    /// Unix seconds of the last applied expansion step.
    pub last_expansion: u64,
    pub is_active: bool,
}

impl ReserveToken {
    pub fn new(
        gd_supply: Amount,
        reserve_supply: Amount,
        reserve_ratio_ppm: u64,
        reserve_decimals: u32,
        now: u64,
    ) -> Self {
        Self {
            gd_supply,
            reserve_supply,
            reserve_ratio_ppm,
            reserve_decimals,
            last_expansion: now,
            is_active: true,
        }
    }

    /// True when the ratio sits at the top of its range (a linear curve).
    pub fn is_fully_backed(&self) -> bool {
        self.reserve_ratio_ppm == PPM_DENOM
    }

    /// Deactivate by zeroing supply; records are never deleted.
    pub fn deactivate(&mut self) {
        self.gd_supply = 0;
        self.reserve_supply = 0;
        self.is_active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deactivate_zeroes_supply() {
        let mut token = ReserveToken::new(1_000, 500, 800_000, 8, 0);
        assert!(token.is_active);
        token.deactivate();
        assert!(!token.is_active);
        assert_eq!(token.gd_supply, 0);
        assert_eq!(token.reserve_supply, 0);
    }
}
