//! Buy/sell/mint orchestration over the market maker
//!
//! The orchestrator is the market maker's controller: every curve mutation
//! flows through here. It validates inputs, moves the reserve asset through
//! the token-ledger collaborator, mints and burns GD, and rate-limits the
//! periodic interest mint. Failed operations commit nothing.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use curve_math::{mul_div_floor, MathError};
use market_maker::{MarketError, MarketMaker};
use reserve_core::{Address, Amount, AuthorizationContext, Clock, TokenLedger, Whitelist};

use crate::contribution::ContributionPolicy;
use crate::error::{ReserveError, Result};

/// Breakdown of one periodic interest-and-UBI mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestMintOutcome {
    /// GD minted price-neutrally against the full reserve deposit.
    pub gd_interest: Amount,
    /// Share of `gd_interest` minted to the calling fund manager.
    pub caller_share: Amount,
    /// Share of `gd_interest` minted to the UBI recipient.
    pub ubi_share: Amount,
    /// Expansion mint (also to the UBI recipient); zero when no daily
    /// expansion step was due.
    pub gd_expansion: Amount,
}

pub struct Reserve {
    /// Principal under which this orchestrator holds reserve balances.
    address: Address,
    controller: Address,
    fund_manager: Address,
    ubi_recipient: Address,
    /// The single tradable reserve asset; other initialized assets exist
    /// only for bootstrapping.
    canonical_asset: Address,
    block_interval: u64,
    last_minted: u64,
    ended: bool,
    market: MarketMaker,
}

impl Reserve {
    /// `market` must have been constructed with `address` as its
    /// controller; the orchestrator acts on it under that principal.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        address: impl Into<Address>,
        controller: impl Into<Address>,
        fund_manager: impl Into<Address>,
        ubi_recipient: impl Into<Address>,
        canonical_asset: impl Into<Address>,
        block_interval: u64,
        market: MarketMaker,
    ) -> Self {
        Self {
            address: address.into(),
            controller: controller.into(),
            fund_manager: fund_manager.into(),
            ubi_recipient: ubi_recipient.into(),
            canonical_asset: canonical_asset.into(),
            block_interval,
            last_minted: 0,
            ended: false,
            market,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn market(&self) -> &MarketMaker {
        &self.market
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    fn self_auth(&self) -> AuthorizationContext {
        AuthorizationContext::new(self.address.clone())
    }

    fn ensure_live(&self) -> Result<()> {
        if self.ended {
            return Err(ReserveError::Ended);
        }
        Ok(())
    }

    fn ensure_controller(&self, auth: &AuthorizationContext) -> Result<()> {
        if !auth.is(&self.controller) {
            return Err(ReserveError::Unauthorized(auth.caller.clone()));
        }
        Ok(())
    }

    fn ensure_canonical(&self, asset: &Address) -> Result<()> {
        if *asset != self.canonical_asset {
            return Err(ReserveError::NotActive(asset.clone()));
        }
        Ok(())
    }

    /// Create the curve record for an asset. Controller-gated.
    #[allow(clippy::too_many_arguments)]
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
        self.ensure_live()?;
        self.ensure_controller(auth)?;
        self.market.initialize_token(
            &self.self_auth(),
            asset,
            gd_supply,
            reserve_supply,
            reserve_ratio_ppm,
            reserve_decimals,
            clock,
        )?;
        Ok(())
    }

    pub fn current_price_wad(&self, asset: &Address) -> Result<u128> {
        Ok(self.market.current_price_wad(asset)?)
    }

    /// Exchange `amount_in` of the canonical reserve asset for GD.
    ///
    /// The buyer must have pre-approved the transfer to this orchestrator's
    /// address. Fails with `SlippageExceeded` when the quote is below
    /// `min_return`; nothing moves on failure.
    pub fn buy(
        &mut self,
        auth: &AuthorizationContext,
        asset: &Address,
        amount_in: Amount,
        min_return: Amount,
        gd: &mut dyn TokenLedger,
        reserve_asset: &mut dyn TokenLedger,
        whitelist: &dyn Whitelist,
    ) -> Result<Amount> {
        self.ensure_live()?;
        self.ensure_canonical(asset)?;
        if amount_in == 0 {
            return Err(ReserveError::InvalidAmount("zero buy amount".into()));
        }
        if !whitelist.is_whitelisted(&auth.caller) && !whitelist.is_registered_contract(&auth.caller)
        {
            return Err(ReserveError::NotWhitelisted(auth.caller.clone()));
        }

        let price_before = self.market.current_price_wad(asset)?;
        let quote = self.market.buy_return(asset, amount_in)?;
        if quote < min_return {
            return Err(ReserveError::SlippageExceeded {
                minimum: min_return,
                actual: quote,
            });
        }
        // the curve commit must be infallible once the deposit is taken
        let rec = self.market.token(asset)?;
        if rec.gd_supply.checked_add(quote).is_none()
            || rec.reserve_supply.checked_add(amount_in).is_none()
        {
            return Err(MarketError::Arithmetic(MathError::Overflow).into());
        }

        reserve_asset.transfer_from(&self.address, &auth.caller, &self.address, amount_in)?;
        let minted = self.market.buy(&self.self_auth(), asset, amount_in)?;
        debug_assert_eq!(minted, quote);
        gd.mint(&auth.caller, minted)?;

        let price_after = self.market.current_price_wad(asset)?;
        info!(
            event = "token_purchased",
            buyer = %auth.caller,
            asset = %asset,
            amount_in,
            gd_out = minted,
            price_before,
            price_after,
        );
        Ok(minted)
    }

    /// Redeem `gd_in` for the canonical reserve asset, net of the
    /// contribution deduction. `min_return` is checked after the deduction.
    #[allow(clippy::too_many_arguments)]
    pub fn sell(
        &mut self,
        auth: &AuthorizationContext,
        asset: &Address,
        gd_in: Amount,
        min_return: Amount,
        gd: &mut dyn TokenLedger,
        reserve_asset: &mut dyn TokenLedger,
        policy: &dyn ContributionPolicy,
    ) -> Result<Amount> {
        self.ensure_live()?;
        self.ensure_canonical(asset)?;
        if gd_in == 0 {
            return Err(ReserveError::InvalidAmount("zero sell amount".into()));
        }

        let price_before = self.market.current_price_wad(asset)?;
        let quote = self.market.sell_return(asset, gd_in)?;
        let contribution = policy.contribution(quote).min(quote);
        let net = quote - contribution;
        if net < min_return {
            return Err(ReserveError::SlippageExceeded {
                minimum: min_return,
                actual: net,
            });
        }
        let held = reserve_asset.balance_of(&self.address);
        if held < net {
            return Err(ReserveError::InsufficientBalance {
                requested: net,
                available: held,
            });
        }

        gd.burn(&auth.caller, gd_in)?;
        let paid = self
            .market
            .sell_with_contribution(&self.self_auth(), asset, gd_in, contribution)?;
        debug_assert_eq!(paid, net);
        reserve_asset.transfer(&self.address, &auth.caller, paid)?;

        let price_after = self.market.current_price_wad(asset)?;
        info!(
            event = "token_sold",
            seller = %auth.caller,
            asset = %asset,
            gd_in,
            reserve_out = paid,
            contribution,
            price_before,
            price_after,
        );
        Ok(paid)
    }

    /// Check the interest-mint interval gate without mutating.
    pub fn mint_due(&self, clock: &dyn Clock) -> Result<()> {
        self.ensure_live()?;
        let elapsed = clock.now().saturating_sub(self.last_minted);
        if self.last_minted != 0 && elapsed < self.block_interval {
            return Err(ReserveError::IntervalNotElapsed {
                remaining: self.block_interval - elapsed,
            });
        }
        Ok(())
    }

    /// Every gate of the periodic interest mint, without mutating. Harvest
    /// loops call this before moving any funds so a rejected mint moves
    /// nothing.
    pub fn mint_preflight(
        &self,
        auth: &AuthorizationContext,
        asset: &Address,
        clock: &dyn Clock,
    ) -> Result<()> {
        self.ensure_live()?;
        if !auth.is(&self.fund_manager) {
            return Err(ReserveError::Unauthorized(auth.caller.clone()));
        }
        self.ensure_canonical(asset)?;
        if !self.market.is_initialized(asset) {
            return Err(ReserveError::ReserveNotInitialized(asset.clone()));
        }
        self.mint_due(clock)
    }

    /// Periodic interest deposit: mint GD price-neutrally against the full
    /// `total_reserve_in`, split `interest_portion/total_reserve_in` to the
    /// calling fund manager and the rest to the UBI recipient, then apply
    /// any due expansion step with its mint going to the UBI recipient.
    ///
    /// The caller must have transferred `total_reserve_in` of the asset to
    /// this orchestrator's address beforehand; the curve's reserve side
    /// grows by the entire amount regardless of the interest split.
    pub fn mint_interest_and_ubi(
        &mut self,
        auth: &AuthorizationContext,
        asset: &Address,
        total_reserve_in: Amount,
        interest_portion: Amount,
        gd: &mut dyn TokenLedger,
        clock: &dyn Clock,
    ) -> Result<InterestMintOutcome> {
        if let Err(e) = self.mint_preflight(auth, asset, clock) {
            warn!(event = "interest_mint_rejected", caller = %auth.caller, error = %e);
            return Err(e);
        }
        if interest_portion > total_reserve_in {
            return Err(ReserveError::InvalidAmount(format!(
                "interest portion {interest_portion} exceeds total {total_reserve_in}"
            )));
        }
        let now = clock.now();

        let gd_interest = self
            .market
            .mint_interest(&self.self_auth(), asset, total_reserve_in)?;
        let caller_share = if total_reserve_in > 0 {
            mul_div_floor(gd_interest, interest_portion, total_reserve_in)
                .map_err(MarketError::from)?
        } else {
            0
        };
        let ubi_share = gd_interest - caller_share;

        // The direct expansion entry point fails when no daily step is due;
        // inside the composite harvest that outcome is a zero expansion mint.
        let gd_expansion = match self.market.mint_expansion(&self.self_auth(), asset, clock) {
            Ok(minted) => minted,
            Err(MarketError::IntervalNotElapsed { .. }) => 0,
            Err(e) => return Err(e.into()),
        };

        gd.mint(&auth.caller, caller_share)?;
        gd.mint(&self.ubi_recipient, ubi_share + gd_expansion)?;
        self.last_minted = now;

        info!(
            event = "interest_minted",
            asset = %asset,
            total_reserve_in,
            interest_portion,
            gd_interest,
            caller_share,
            ubi_share,
            gd_expansion,
        );
        Ok(InterestMintOutcome {
            gd_interest,
            caller_share,
            ubi_share,
            gd_expansion,
        })
    }

    /// Authorized teardown: move the remaining reserve balance to
    /// `recovery` and hand the market maker's controller role over.
    /// Irreversible; a second call fails with `Ended` and changes nothing.
    pub fn end(
        &mut self,
        auth: &AuthorizationContext,
        recovery: &Address,
        reserve_asset: &mut dyn TokenLedger,
    ) -> Result<Amount> {
        self.ensure_live()?;
        self.ensure_controller(auth)?;
        let remaining = reserve_asset.balance_of(&self.address);
        if remaining > 0 {
            reserve_asset.transfer(&self.address, recovery, remaining)?;
        }
        self.market
            .set_controller(&self.self_auth(), recovery.clone())?;
        self.ended = true;
        info!(event = "reserve_ended", recovery = %recovery, remaining);
        Ok(remaining)
    }

    pub fn set_block_interval(&mut self, auth: &AuthorizationContext, interval: u64) -> Result<()> {
        self.ensure_live()?;
        self.ensure_controller(auth)?;
        self.block_interval = interval;
        Ok(())
    }

    pub fn set_recipients(
        &mut self,
        auth: &AuthorizationContext,
        fund_manager: impl Into<Address>,
        ubi_recipient: impl Into<Address>,
    ) -> Result<()> {
        self.ensure_live()?;
        self.ensure_controller(auth)?;
        self.fund_manager = fund_manager.into();
        self.ubi_recipient = ubi_recipient.into();
        Ok(())
    }
}
