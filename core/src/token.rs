//! Token ledger collaborator interface
//!
//! The ERC20-equivalent surface the reserve core consumes. `MemoryToken`
//! backs tests and in-process deployments; the core never implements
//! transfer mechanics beyond this interface.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CoreError, Result};
use crate::{Address, Amount};

pub trait TokenLedger {
    fn mint(&mut self, to: &Address, amount: Amount) -> Result<()>;
    fn burn(&mut self, from: &Address, amount: Amount) -> Result<()>;
    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<()>;
    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<()>;
    fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount);
    fn balance_of(&self, who: &Address) -> Amount;
    fn total_supply(&self) -> Amount;
}

/// In-process token ledger with balances and allowances.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryToken {
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
    total_supply: Amount,
}

impl MemoryToken {
    pub fn new() -> Self {
        Self::default()
    }

    fn debit(&mut self, from: &Address, amount: Amount) -> Result<()> {
        let balance = self.balances.get(from).copied().unwrap_or(0);
        if balance < amount {
            return Err(CoreError::InsufficientBalance {
                requested: amount,
                available: balance,
            });
        }
        self.balances.insert(from.clone(), balance - amount);
        Ok(())
    }

    fn credit(&mut self, to: &Address, amount: Amount) -> Result<()> {
        let balance = self.balances.get(to).copied().unwrap_or(0);
        let updated = balance
            .checked_add(amount)
            .ok_or(CoreError::BalanceOverflow)?;
        self.balances.insert(to.clone(), updated);
        Ok(())
    }
}

impl TokenLedger for MemoryToken {
    fn mint(&mut self, to: &Address, amount: Amount) -> Result<()> {
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(CoreError::BalanceOverflow)?;
        self.credit(to, amount)
    }

    fn burn(&mut self, from: &Address, amount: Amount) -> Result<()> {
        self.debit(from, amount)?;
        self.total_supply -= amount;
        Ok(())
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<()> {
        self.debit(from, amount)?;
        self.credit(to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<()> {
        let key = (from.clone(), spender.clone());
        let approved = self.allowances.get(&key).copied().unwrap_or(0);
        if approved < amount {
            return Err(CoreError::InsufficientAllowance {
                requested: amount,
                approved,
            });
        }
        self.debit(from, amount)?;
        self.allowances.insert(key, approved - amount);
        self.credit(to, amount)
    }

    fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount) {
        self.allowances
            .insert((owner.clone(), spender.clone()), amount);
    }

    fn balance_of(&self, who: &Address) -> Amount {
        self.balances.get(who).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }
}
