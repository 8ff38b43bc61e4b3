//! Harvest loop state and orchestration

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use reserve::Reserve;
use reserve_core::{Address, Amount, AuthorizationContext, Clock, TokenLedger};

use crate::error::{FundError, Result};
use crate::source::InterestSource;

/// Governance-mutated harvest configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundManagerConfig {
    pub block_interval: u64,
    pub bridge_recipient: Address,
    pub ubi_recipient: Address,
    pub reserve_address: Address,
}

/// Result of one successful harvest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestOutcome {
    pub interest: Amount,
    pub principal: Amount,
    pub gd_to_source: Amount,
    pub gd_to_ubi: Amount,
    pub gd_expansion: Amount,
}

/// Per-source cycle: Idle → (interval elapsed) → Collecting → Idle.
/// Sole writer of the last-collection marker.
pub struct FundManager {
    address: Address,
    controller: Address,
    config: FundManagerConfig,
    sources: HashSet<Address>,
    last_collection: u64,
    collecting: bool,
}

impl FundManager {
    pub fn new(
        address: impl Into<Address>,
        controller: impl Into<Address>,
        config: FundManagerConfig,
    ) -> Self {
        Self {
            address: address.into(),
            controller: controller.into(),
            config,
            sources: HashSet::new(),
            last_collection: 0,
            collecting: false,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn config(&self) -> &FundManagerConfig {
        &self.config
    }

    pub fn is_whitelisted(&self, source: &Address) -> bool {
        self.sources.contains(source)
    }

    fn ensure_controller(&self, auth: &AuthorizationContext) -> Result<()> {
        if !auth.is(&self.controller) {
            return Err(FundError::Unauthorized(auth.caller.clone()));
        }
        Ok(())
    }

    pub fn register_source(
        &mut self,
        auth: &AuthorizationContext,
        source: impl Into<Address>,
    ) -> Result<()> {
        self.ensure_controller(auth)?;
        self.sources.insert(source.into());
        Ok(())
    }

    pub fn remove_source(&mut self, auth: &AuthorizationContext, source: &Address) -> Result<()> {
        self.ensure_controller(auth)?;
        self.sources.remove(source);
        Ok(())
    }

    pub fn set_block_interval(&mut self, auth: &AuthorizationContext, interval: u64) -> Result<()> {
        self.ensure_controller(auth)?;
        self.config.block_interval = interval;
        Ok(())
    }

    pub fn set_bridge_and_ubi_recipient(
        &mut self,
        auth: &AuthorizationContext,
        bridge: impl Into<Address>,
        ubi: impl Into<Address>,
    ) -> Result<()> {
        self.ensure_controller(auth)?;
        self.config.bridge_recipient = bridge.into();
        self.config.ubi_recipient = ubi.into();
        Ok(())
    }

    /// Harvest one source: pull accrued yield, forward it to the reserve's
    /// interest mint, and credit the interest-share GD back to the source.
    ///
    /// All gates (whitelist, the interval marker, the reserve's full mint
    /// preflight) are checked before any funds move, so a rejected harvest
    /// leaves every balance untouched.
    #[allow(clippy::too_many_arguments)]
    pub fn transfer_interest(
        &mut self,
        source_id: &Address,
        source: &mut dyn InterestSource,
        reserve: &mut Reserve,
        asset: &Address,
        gd: &mut dyn TokenLedger,
        reserve_asset: &mut dyn TokenLedger,
        clock: &dyn Clock,
    ) -> Result<HarvestOutcome> {
        if !self.sources.contains(source_id) {
            return Err(FundError::NotWhitelisted(source_id.clone()));
        }
        let now = clock.now();
        let elapsed = now.saturating_sub(self.last_collection);
        if self.last_collection != 0 && elapsed < self.config.block_interval {
            let remaining = self.config.block_interval - elapsed;
            warn!(event = "harvest_rejected", source = %source_id, remaining);
            return Err(FundError::IntervalNotElapsed { remaining });
        }
        if self.collecting {
            return Err(FundError::Collecting);
        }
        reserve.mint_preflight(&AuthorizationContext::new(self.address.clone()), asset, clock)?;

        self.collecting = true;
        let result = self.collect(source_id, source, reserve, asset, gd, reserve_asset, clock);
        self.collecting = false;

        let outcome = result?;
        self.last_collection = now;
        info!(
            event = "interest_harvested",
            source = %source_id,
            interest = outcome.interest,
            principal = outcome.principal,
            gd_to_source = outcome.gd_to_source,
            gd_to_ubi = outcome.gd_to_ubi,
            gd_expansion = outcome.gd_expansion,
        );
        Ok(outcome)
    }

    #[allow(clippy::too_many_arguments)]
    fn collect(
        &mut self,
        source_id: &Address,
        source: &mut dyn InterestSource,
        reserve: &mut Reserve,
        asset: &Address,
        gd: &mut dyn TokenLedger,
        reserve_asset: &mut dyn TokenLedger,
        clock: &dyn Clock,
    ) -> Result<HarvestOutcome> {
        let (interest, principal) = source.collect(reserve_asset, &self.address)?;
        let total = interest + principal;

        let reserve_address = reserve.address().clone();
        if total > 0 {
            reserve_asset.transfer(&self.address, &reserve_address, total)?;
        }
        let minted = reserve.mint_interest_and_ubi(
            &AuthorizationContext::new(self.address.clone()),
            asset,
            total,
            interest,
            gd,
            clock,
        )?;

        // pass-through: the interest share belongs to the staking source
        if minted.caller_share > 0 {
            gd.transfer(&self.address, source_id, minted.caller_share)?;
        }

        Ok(HarvestOutcome {
            interest,
            principal,
            gd_to_source: minted.caller_share,
            gd_to_ubi: minted.ubi_share + minted.gd_expansion,
            gd_expansion: minted.gd_expansion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FundManagerConfig {
        FundManagerConfig {
            block_interval: 5_000,
            bridge_recipient: "bridge".to_string(),
            ubi_recipient: "ubi-pool".to_string(),
            reserve_address: "reserve".to_string(),
        }
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let json = serde_json::to_string(&config()).unwrap();
        let back: FundManagerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.block_interval, 5_000);
        assert_eq!(back.reserve_address, "reserve");
    }

    #[test]
    fn test_source_registry() {
        let mut manager = FundManager::new("fund-manager", "avatar", config());
        let avatar = AuthorizationContext::new("avatar");

        manager.register_source(&avatar, "pool-a").unwrap();
        assert!(manager.is_whitelisted(&"pool-a".to_string()));
        manager.remove_source(&avatar, &"pool-a".to_string()).unwrap();
        assert!(!manager.is_whitelisted(&"pool-a".to_string()));
    }

    #[test]
    fn test_config_setters_gated() {
        let mut manager = FundManager::new("fund-manager", "avatar", config());
        let intruder = AuthorizationContext::new("intruder");
        assert!(matches!(
            manager.set_block_interval(&intruder, 1),
            Err(FundError::Unauthorized(_))
        ));

        let avatar = AuthorizationContext::new("avatar");
        manager.set_block_interval(&avatar, 60).unwrap();
        manager
            .set_bridge_and_ubi_recipient(&avatar, "bridge2", "ubi2")
            .unwrap();
        assert_eq!(manager.config().block_interval, 60);
        assert_eq!(manager.config().ubi_recipient, "ubi2");
    }
}
