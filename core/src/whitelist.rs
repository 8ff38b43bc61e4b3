//! Identity whitelist collaborator interface

use std::collections::HashSet;

use crate::Address;

/// Membership checks consulted before deposits on behalf of a caller.
/// Membership management itself lives outside the core.
pub trait Whitelist {
    fn is_whitelisted(&self, addr: &Address) -> bool;
    fn is_registered_contract(&self, addr: &Address) -> bool;
}

/// Accepts every principal. Default for deployments without identity gating.
#[derive(Debug, Clone, Default)]
pub struct OpenWhitelist;

impl Whitelist for OpenWhitelist {
    fn is_whitelisted(&self, _addr: &Address) -> bool {
        true
    }

    fn is_registered_contract(&self, _addr: &Address) -> bool {
        true
    }
}

/// Fixed membership sets, used by tests.
#[derive(Debug, Clone, Default)]
pub struct StaticWhitelist {
    members: HashSet<Address>,
    contracts: HashSet<Address>,
}

impl StaticWhitelist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(&mut self, addr: impl Into<Address>) {
        self.members.insert(addr.into());
    }

    pub fn add_contract(&mut self, addr: impl Into<Address>) {
        self.contracts.insert(addr.into());
    }
}

impl Whitelist for StaticWhitelist {
    fn is_whitelisted(&self, addr: &Address) -> bool {
        self.members.contains(addr)
    }

    fn is_registered_contract(&self, addr: &Address) -> bool {
        self.contracts.contains(addr)
    }
}
