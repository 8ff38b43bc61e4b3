//! Curve ledger operations
//!
//! Buy: `gd_out = S · ((1 + in/R)^(ratio/1e6) − 1)`
//! Sell: `reserve_out = R · (1 − (1 − in/S)^(1e6/ratio))`
//! Interest mint (price-neutral): `gd_out = in · S / R`
//! Expansion mint (price-constant): `gd_out = S · old_ratio/new_ratio − S`
//!
//! All divisions round toward zero, so quoted returns never exceed the
//! exact curve value.

use std::collections::HashMap;

use curve_math::{mul_div_floor, pow_frac, MathError, WAD};
use reserve_core::constants::{PPM_DENOM, SECONDS_PER_DAY};
use reserve_core::{Address, Amount, AuthorizationContext, Clock};

use crate::error::{MarketError, Result};
use crate::token::ReserveToken;

/// Per-asset bonding-curve ledger. Sole owner of every `ReserveToken`
/// record; all mutation flows through these operations.
#[derive(Debug, Clone)]
pub struct MarketMaker {
    controller: Address,
    /// Daily ratio contraction factor, wad-scaled, at most `WAD`.
    daily_expansion_wad: u128,
    tokens: HashMap<Address, ReserveToken>,
}

impl MarketMaker {
    pub fn new(controller: impl Into<Address>, daily_expansion_wad: u128) -> Self {
        Self {
            controller: controller.into(),
            daily_expansion_wad: daily_expansion_wad.min(WAD),
            tokens: HashMap::new(),
        }
    }

    pub fn controller(&self) -> &Address {
        &self.controller
    }

    pub fn daily_expansion_wad(&self) -> u128 {
        self.daily_expansion_wad
    }

    fn ensure_controller(&self, auth: &AuthorizationContext) -> Result<()> {
        if !auth.is(&self.controller) {
            return Err(MarketError::Unauthorized(auth.caller.clone()));
        }
        Ok(())
    }

    /// Hand the controller role to another principal.
    pub fn set_controller(
        &mut self,
        auth: &AuthorizationContext,
        new_controller: impl Into<Address>,
    ) -> Result<()> {
        self.ensure_controller(auth)?;
        self.controller = new_controller.into();
        Ok(())
    }

    pub fn set_daily_expansion(
        &mut self,
        auth: &AuthorizationContext,
        daily_expansion_wad: u128,
    ) -> Result<()> {
        self.ensure_controller(auth)?;
        if daily_expansion_wad == 0 || daily_expansion_wad > WAD {
            return Err(MarketError::InvalidAmount(format!(
                "daily expansion factor {daily_expansion_wad} outside (0, 1e18]"
            )));
        }
        self.daily_expansion_wad = daily_expansion_wad;
        Ok(())
    }

    /// Create the curve record for a reserve asset.
    pub fn initialize_token(
        &mut self,
        auth: &AuthorizationContext,
        asset: &Address,
        gd_supply: Amount,
        reserve_supply: Amount,
        reserve_ratio_ppm: u64,
        reserve_decimals: u32,
        clock: &dyn Clock,
    ) -> Result<()> {
        self.ensure_controller(auth)?;
        if reserve_ratio_ppm == 0 || reserve_ratio_ppm > PPM_DENOM {
            return Err(MarketError::InvalidRatio(reserve_ratio_ppm));
        }
        if self.tokens.contains_key(asset) {
            return Err(MarketError::AlreadyInitialized(asset.clone()));
        }
        self.tokens.insert(
            asset.clone(),
            ReserveToken::new(
                gd_supply,
                reserve_supply,
                reserve_ratio_ppm,
                reserve_decimals,
                clock.now(),
            ),
        );
        Ok(())
    }

    pub fn token(&self, asset: &Address) -> Result<&ReserveToken> {
        self.tokens
            .get(asset)
            .ok_or_else(|| MarketError::NotInitialized(asset.clone()))
    }

    pub fn is_initialized(&self, asset: &Address) -> bool {
        self.tokens.contains_key(asset)
    }

    fn active(&self, asset: &Address) -> Result<&ReserveToken> {
        let rec = self.token(asset)?;
        if !rec.is_active {
            return Err(MarketError::NotActive(asset.clone()));
        }
        Ok(rec)
    }

    fn active_mut(&mut self, asset: &Address) -> Result<&mut ReserveToken> {
        let rec = self
            .tokens
            .get_mut(asset)
            .ok_or_else(|| MarketError::NotInitialized(asset.clone()))?;
        if !rec.is_active {
            return Err(MarketError::NotActive(asset.clone()));
        }
        Ok(rec)
    }

    /// Current price of one GD base unit in reserve base units, wad-scaled:
    /// `reserve_supply / (gd_supply · ratio)`.
    pub fn current_price_wad(&self, asset: &Address) -> Result<u128> {
        let rec = self.active(asset)?;
        let denominator = rec
            .gd_supply
            .checked_mul(rec.reserve_ratio_ppm as u128)
            .ok_or(MathError::Overflow)?;
        if denominator == 0 {
            return Err(MarketError::InvalidAmount(
                "price undefined on empty curve".into(),
            ));
        }
        Ok(mul_div_floor(
            rec.reserve_supply,
            WAD * PPM_DENOM as u128,
            denominator,
        )?)
    }

    /// GD received for a reserve deposit. Pure quote, no mutation.
    pub fn buy_return(&self, asset: &Address, reserve_in: Amount) -> Result<Amount> {
        let rec = self.active(asset)?;
        if reserve_in == 0 {
            return Ok(0);
        }
        if rec.reserve_supply == 0 || rec.gd_supply == 0 {
            return Err(MarketError::InvalidAmount(
                "curve has no liquidity".into(),
            ));
        }
        if rec.is_fully_backed() {
            return Ok(mul_div_floor(reserve_in, rec.gd_supply, rec.reserve_supply)?);
        }
        let grown = rec
            .reserve_supply
            .checked_add(reserve_in)
            .ok_or(MathError::Overflow)?;
        let factor = pow_frac(
            grown,
            rec.reserve_supply,
            rec.reserve_ratio_ppm as u128,
            PPM_DENOM as u128,
        )?;
        Ok(mul_div_floor(
            rec.gd_supply,
            factor.saturating_sub(WAD),
            WAD,
        )?)
    }

    /// Reserve released for a GD redemption. Pure quote, no mutation.
    pub fn sell_return(&self, asset: &Address, gd_in: Amount) -> Result<Amount> {
        let rec = self.active(asset)?;
        if gd_in > rec.gd_supply {
            return Err(MarketError::InsufficientSupply {
                requested: gd_in,
                available: rec.gd_supply,
            });
        }
        if gd_in == 0 {
            return Ok(0);
        }
        if gd_in == rec.gd_supply {
            return Ok(rec.reserve_supply);
        }
        if rec.is_fully_backed() {
            return Ok(mul_div_floor(gd_in, rec.reserve_supply, rec.gd_supply)?);
        }
        let factor = pow_frac(
            rec.gd_supply - gd_in,
            rec.gd_supply,
            PPM_DENOM as u128,
            rec.reserve_ratio_ppm as u128,
        )?;
        Ok(mul_div_floor(
            rec.reserve_supply,
            WAD.saturating_sub(factor),
            WAD,
        )?)
    }

    /// Commit a buy: supplies move along the curve, the ratio is untouched.
    pub fn buy(
        &mut self,
        auth: &AuthorizationContext,
        asset: &Address,
        reserve_in: Amount,
    ) -> Result<Amount> {
        self.ensure_controller(auth)?;
        let gd_out = self.buy_return(asset, reserve_in)?;
        let rec = self.active_mut(asset)?;
        let new_gd = rec.gd_supply.checked_add(gd_out).ok_or(MathError::Overflow)?;
        let new_reserve = rec
            .reserve_supply
            .checked_add(reserve_in)
            .ok_or(MathError::Overflow)?;
        rec.gd_supply = new_gd;
        rec.reserve_supply = new_reserve;
        Ok(gd_out)
    }

    /// Commit a sell: supplies move along the curve, the ratio is untouched.
    pub fn sell(
        &mut self,
        auth: &AuthorizationContext,
        asset: &Address,
        gd_in: Amount,
    ) -> Result<Amount> {
        self.sell_with_contribution(auth, asset, gd_in, 0)
    }

    /// Commit a sell where `contribution` of the return stays in the
    /// reserve: the reserve side shrinks only by the paid-out amount, so
    /// the routed cut thickens backing instead of leaving the curve.
    pub fn sell_with_contribution(
        &mut self,
        auth: &AuthorizationContext,
        asset: &Address,
        gd_in: Amount,
        contribution: Amount,
    ) -> Result<Amount> {
        self.ensure_controller(auth)?;
        let reserve_out = self.sell_return(asset, gd_in)?;
        if contribution > reserve_out {
            return Err(MarketError::InvalidAmount(format!(
                "contribution {contribution} exceeds sell return {reserve_out}"
            )));
        }
        let paid_out = reserve_out - contribution;
        let rec = self.active_mut(asset)?;
        rec.gd_supply -= gd_in;
        rec.reserve_supply -= paid_out;
        Ok(paid_out)
    }

    /// GD to mint for an interest deposit at the current price; backed 1:1
    /// by new reserve, so the price does not move.
    pub fn calculate_mint_interest(&self, asset: &Address, reserve_in: Amount) -> Result<Amount> {
        let rec = self.active(asset)?;
        if rec.reserve_supply == 0 {
            return Err(MarketError::InvalidAmount(
                "interest mint undefined on empty curve".into(),
            ));
        }
        Ok(mul_div_floor(reserve_in, rec.gd_supply, rec.reserve_supply)?)
    }

    /// Commit an interest mint: both sides grow, price unchanged.
    pub fn mint_interest(
        &mut self,
        auth: &AuthorizationContext,
        asset: &Address,
        reserve_in: Amount,
    ) -> Result<Amount> {
        self.ensure_controller(auth)?;
        let gd_out = self.calculate_mint_interest(asset, reserve_in)?;
        let rec = self.active_mut(asset)?;
        let new_gd = rec.gd_supply.checked_add(gd_out).ok_or(MathError::Overflow)?;
        let new_reserve = rec
            .reserve_supply
            .checked_add(reserve_in)
            .ok_or(MathError::Overflow)?;
        rec.gd_supply = new_gd;
        rec.reserve_supply = new_reserve;
        Ok(gd_out)
    }

    /// Next scheduled ratio: one daily contraction step, floored, never zero.
    fn next_ratio(&self, ratio_ppm: u64) -> Result<u64> {
        let next = mul_div_floor(ratio_ppm as u128, self.daily_expansion_wad, WAD)?;
        Ok((next as u64).max(1))
    }

    fn expansion_due(rec: &ReserveToken, now: u64) -> Result<()> {
        let elapsed = now.saturating_sub(rec.last_expansion);
        if elapsed < SECONDS_PER_DAY {
            return Err(MarketError::IntervalNotElapsed {
                remaining: SECONDS_PER_DAY - elapsed,
            });
        }
        Ok(())
    }

    /// Apply exactly one daily contraction step to the reserve ratio.
    ///
    /// At most one step is applied per call, however many days have
    /// elapsed; callers track the schedule by invoking daily. Skipped days
    /// do not compound.
    pub fn expand_reserve_ratio(
        &mut self,
        auth: &AuthorizationContext,
        asset: &Address,
        clock: &dyn Clock,
    ) -> Result<(u64, u64)> {
        self.ensure_controller(auth)?;
        let now = clock.now();
        let next = {
            let rec = self.active(asset)?;
            Self::expansion_due(rec, now)?;
            self.next_ratio(rec.reserve_ratio_ppm)?
        };
        let rec = self.active_mut(asset)?;
        let old = rec.reserve_ratio_ppm;
        rec.reserve_ratio_ppm = next;
        rec.last_expansion = now;
        Ok((old, next))
    }

    /// GD the next expansion step would mint to hold the price constant.
    ///
    /// Price is `R / (S · ratio)` and the reserve is untouched by
    /// expansion, so constancy requires `S' = S · old_ratio / new_ratio`.
    pub fn calculate_mint_expansion(&self, asset: &Address) -> Result<Amount> {
        let rec = self.active(asset)?;
        let next = self.next_ratio(rec.reserve_ratio_ppm)?;
        let grown = mul_div_floor(rec.gd_supply, rec.reserve_ratio_ppm as u128, next as u128)?;
        Ok(grown.saturating_sub(rec.gd_supply))
    }

    /// Apply the daily ratio step together with its price-preserving
    /// supply mint. Mutates `gd_supply` and the ratio, never the reserve.
    pub fn mint_expansion(
        &mut self,
        auth: &AuthorizationContext,
        asset: &Address,
        clock: &dyn Clock,
    ) -> Result<Amount> {
        self.ensure_controller(auth)?;
        let now = clock.now();
        let (next, minted) = {
            let rec = self.active(asset)?;
            Self::expansion_due(rec, now)?;
            let next = self.next_ratio(rec.reserve_ratio_ppm)?;
            let grown =
                mul_div_floor(rec.gd_supply, rec.reserve_ratio_ppm as u128, next as u128)?;
            (next, grown.saturating_sub(rec.gd_supply))
        };
        let rec = self.active_mut(asset)?;
        rec.reserve_ratio_ppm = next;
        rec.gd_supply += minted;
        rec.last_expansion = now;
        Ok(minted)
    }
}
