//! Stake, withdraw, and collect operations
//!
//! Every operation first settles accrued yield against the current
//! exchange rate, then applies its own stake change. Settlement converts
//! the pool's excess interest-token holding into GD, splits it between
//! stakers (by `effective/total`) and UBI, and advances the per-token
//! accumulator. All updates are computed against copies and committed
//! only when every step has succeeded.

use std::collections::HashMap;

use curve_math::{mul_div_ceil, mul_div_floor, MathError, U256, WAD};
use reserve_core::constants::PPM_DENOM;
use reserve_core::{Address, Amount};

use crate::error::{Result, StakingError};
use crate::oracle::ExchangeRateOracle;
use crate::state::{GlobalInterestState, StakerRecord};

/// One settlement's harvest, before and after any stake change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settlement {
    pub newly_minted_gd: Amount,
    pub stakers_share: Amount,
    pub ubi_share: Amount,
    pub excess_itoken: Amount,
}

/// UBI harvest view returned to the fund manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UbiCollection {
    pub ubi_gd: Amount,
    pub settlement: Settlement,
}

pub struct InterestLedger {
    /// GD base units per underlying unit of harvested interest, wad-scaled.
    gd_per_underlying_wad: u128,
    global: GlobalInterestState,
    stakers: HashMap<Address, StakerRecord>,
}

fn narrow(value: U256) -> Result<u128> {
    if value.bits() > 128 {
        return Err(StakingError::Arithmetic(MathError::Overflow));
    }
    Ok(value.low_u128())
}

impl InterestLedger {
    pub fn new(gd_per_underlying_wad: u128) -> Self {
        Self {
            gd_per_underlying_wad,
            global: GlobalInterestState::default(),
            stakers: HashMap::new(),
        }
    }

    pub fn global(&self) -> &GlobalInterestState {
        &self.global
    }

    pub fn staker(&self, staker: &Address) -> Option<&StakerRecord> {
        self.stakers.get(staker)
    }

    /// Settle accrued yield into an updated copy of the global state.
    /// Pure with respect to `self`; callers commit the copy.
    fn settled_global(&self, rate: u128) -> Result<(GlobalInterestState, Settlement)> {
        if rate == 0 {
            return Err(StakingError::InvalidRate);
        }
        let mut global = self.global.clone();
        let required = if global.global_total_stake == 0 {
            0
        } else {
            mul_div_ceil(global.global_total_stake, WAD, rate)?
        };
        let excess = global.itoken_balance.saturating_sub(required);
        if excess == 0 {
            return Ok((global, Settlement::default()));
        }

        let interest_underlying = mul_div_floor(excess, rate, WAD)?;
        let newly_minted_gd =
            mul_div_floor(interest_underlying, self.gd_per_underlying_wad, WAD)?;
        let stakers_share = if global.global_total_stake > 0 {
            mul_div_floor(
                newly_minted_gd,
                global.global_total_effective_stake,
                global.global_total_stake,
            )?
        } else {
            0
        };
        let ubi_share = newly_minted_gd - stakers_share;

        if stakers_share > 0 {
            let step = mul_div_floor(stakers_share, WAD, global.global_total_effective_stake)?;
            global.global_gd_yield_per_token = global
                .global_gd_yield_per_token
                .checked_add(step)
                .ok_or(MathError::Overflow)?;
        }
        global.itoken_balance -= excess;
        global.interest_token_earned_to_date += excess;
        global.gd_interest_earned_to_date += newly_minted_gd;
        global.interest_gd_balance += stakers_share;
        global.ubi_gd_balance += ubi_share;

        Ok((
            global,
            Settlement {
                newly_minted_gd,
                stakers_share,
                ubi_share,
                excess_itoken: excess,
            },
        ))
    }

    /// Settle without any stake change.
    pub fn settle(&mut self, oracle: &dyn ExchangeRateOracle) -> Result<Settlement> {
        let (global, settlement) = self.settled_global(oracle.exchange_rate())?;
        self.global = global;
        Ok(settlement)
    }

    /// Accrued, not-yet-withdrawn GD interest for a staker under the given
    /// global state. Clamped at zero against rounding underflow.
    fn accrued(global: &GlobalInterestState, rec: &StakerRecord) -> Result<Amount> {
        let entitled = U256::from(rec.total_effective_stake)
            * U256::from(global.global_gd_yield_per_token);
        let paid = U256::from(rec.gd_yield_rate_paid);
        if entitled <= paid {
            return Ok(0);
        }
        narrow((entitled - paid) / U256::from(WAD))
    }

    /// Accrued GD interest for a staker at the current accumulator.
    pub fn calculate_gd_interest(&self, staker: &Address) -> Result<Amount> {
        match self.stakers.get(staker) {
            Some(rec) => Self::accrued(&self.global, rec),
            None => Ok(0),
        }
    }

    /// Deposit `amount` underlying, donating `donation_ppm` of future
    /// yield. `amount = 0` is a settlement-only call.
    pub fn stake(
        &mut self,
        staker: &Address,
        amount: Amount,
        donation_ppm: u64,
        oracle: &dyn ExchangeRateOracle,
    ) -> Result<Settlement> {
        if donation_ppm > PPM_DENOM {
            return Err(StakingError::InvalidDonation(donation_ppm));
        }
        let rate = oracle.exchange_rate();
        let (mut global, settlement) = self.settled_global(rate)?;

        let effective_add = mul_div_floor(
            amount,
            (PPM_DENOM - donation_ppm) as u128,
            PPM_DENOM as u128,
        )?;
        let rec = self.stakers.get(staker).cloned().unwrap_or_default();
        let new_paid = narrow(
            U256::from(rec.gd_yield_rate_paid)
                + U256::from(effective_add) * U256::from(global.global_gd_yield_per_token),
        )?;
        let itoken_add = mul_div_floor(amount, WAD, rate)?;

        global.global_total_stake += amount;
        global.global_total_effective_stake += effective_add;
        global.itoken_balance += itoken_add;
        let share_per_token = global.global_gd_yield_per_token;
        self.global = global;

        let entry = self.stakers.entry(staker.clone()).or_default();
        entry.total_stake += amount;
        entry.total_effective_stake += effective_add;
        entry.gd_yield_rate_paid = new_paid;
        entry.last_share_per_token = share_per_token;
        Ok(settlement)
    }

    /// Pay out a staker's accrued GD interest without touching principal.
    pub fn withdraw_gd_interest(
        &mut self,
        staker: &Address,
        oracle: &dyn ExchangeRateOracle,
    ) -> Result<Amount> {
        let rate = oracle.exchange_rate();
        let (mut global, _) = self.settled_global(rate)?;
        let Some(rec) = self.stakers.get(staker).cloned() else {
            return Ok(0);
        };

        let interest = Self::accrued(&global, &rec)?.min(global.interest_gd_balance);
        let new_paid = narrow(
            U256::from(rec.gd_yield_rate_paid) + U256::from(interest) * U256::from(WAD),
        )?;

        global.interest_gd_balance -= interest;
        let mut updated = rec;
        updated.gd_yield_rate_paid = new_paid;
        updated.withdrawn_to_date += interest;
        updated.last_share_per_token = global.global_gd_yield_per_token;
        self.global = global;
        self.stakers.insert(staker.clone(), updated);
        Ok(interest)
    }

    /// Withdraw `amount` principal together with all accrued interest.
    ///
    /// Effective stake shrinks proportionally to the withdrawn fraction
    /// and the yield offset is re-based to the remaining effective stake,
    /// so the cleared entitlement stays cleared.
    pub fn withdraw_stake_and_interest(
        &mut self,
        staker: &Address,
        amount: Amount,
        oracle: &dyn ExchangeRateOracle,
    ) -> Result<(Amount, Amount)> {
        let rate = oracle.exchange_rate();
        let (mut global, _) = self.settled_global(rate)?;
        let rec = self
            .stakers
            .get(staker)
            .cloned()
            .ok_or(StakingError::InsufficientBalance {
                requested: amount,
                available: 0,
            })?;
        if amount > rec.total_stake {
            return Err(StakingError::InsufficientBalance {
                requested: amount,
                available: rec.total_stake,
            });
        }

        let interest = Self::accrued(&global, &rec)?.min(global.interest_gd_balance);
        let effective_remove = if rec.total_stake > 0 {
            mul_div_floor(amount, rec.total_effective_stake, rec.total_stake)?
        } else {
            0
        };
        let new_effective = rec.total_effective_stake - effective_remove;
        let new_paid = narrow(
            U256::from(new_effective) * U256::from(global.global_gd_yield_per_token),
        )?;
        let itoken_remove = mul_div_floor(amount, WAD, rate)?.min(global.itoken_balance);

        global.interest_gd_balance -= interest;
        global.global_total_stake -= amount;
        global.global_total_effective_stake -= effective_remove;
        global.itoken_balance -= itoken_remove;
        let mut updated = rec;
        updated.total_stake -= amount;
        updated.total_effective_stake = new_effective;
        updated.gd_yield_rate_paid = new_paid;
        updated.withdrawn_to_date += interest;
        updated.last_share_per_token = global.global_gd_yield_per_token;
        self.global = global;
        self.stakers.insert(staker.clone(), updated);
        Ok((amount, interest))
    }

    /// Settle and hand the accumulated UBI share to the caller (the fund
    /// manager). No stake changes.
    pub fn collect_ubi_interest(&mut self, oracle: &dyn ExchangeRateOracle) -> Result<UbiCollection> {
        let (mut global, settlement) = self.settled_global(oracle.exchange_rate())?;
        let ubi_gd = global.ubi_gd_balance;
        global.ubi_gd_balance = 0;
        self.global = global;
        Ok(UbiCollection { ubi_gd, settlement })
    }
}
