//! Exchange-rate oracle collaborator
//!
//! Reports the interest-bearing token's redemption rate. Rates are
//! expected to be monotonically non-decreasing; a decreasing rate is
//! undefined behavior upstream of this ledger.

/// Wad-scaled underlying units per interest-token unit.
pub trait ExchangeRateOracle {
    fn exchange_rate(&self) -> u128;
}

/// Settable oracle for tests and fixed-rate deployments.
#[derive(Debug, Clone)]
pub struct FixedRateOracle {
    rate: std::cell::Cell<u128>,
}

impl FixedRateOracle {
    pub fn new(rate: u128) -> Self {
        Self {
            rate: std::cell::Cell::new(rate),
        }
    }

    pub fn set(&self, rate: u128) {
        self.rate.set(rate);
    }
}

impl ExchangeRateOracle for FixedRateOracle {
    fn exchange_rate(&self) -> u128 {
        self.rate.get()
    }
}
