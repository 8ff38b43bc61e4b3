//! Caller authorization context
//!
//! Controller-gated operations take an explicit context identifying the
//! caller instead of reading any ambient identity.

use crate::Address;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationContext {
    pub caller: Address,
}

impl AuthorizationContext {
    pub fn new(caller: impl Into<Address>) -> Self {
        Self {
            caller: caller.into(),
        }
    }

    /// True when the caller matches the given principal.
    pub fn is(&self, principal: &Address) -> bool {
        self.caller == *principal
    }
}
