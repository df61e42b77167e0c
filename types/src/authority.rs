//! The owner capability.
//!
//! Owner-gated operations (rent-cycle length, price updates, vesting-schedule
//! triggers, property acquisition) require a reference to the [`Authority`]
//! whose id was recorded when the component was constructed. Holding the
//! token is the permission; there is no ambient "deployer" identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_AUTHORITY: AtomicU64 = AtomicU64::new(1);

/// Identifier recorded by components to recognise their owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorityId(u64);

impl fmt::Display for AuthorityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "authority#{}", self.0)
    }
}

/// Owner capability token. Deliberately neither `Clone` nor `Copy`.
#[derive(Debug)]
pub struct Authority {
    id: AuthorityId,
}

impl Authority {
    /// Mint a fresh capability, distinct from every other in this process.
    pub fn new() -> Self {
        Self {
            id: AuthorityId(NEXT_AUTHORITY.fetch_add(1, Ordering::Relaxed)),
        }
    }

    pub fn id(&self) -> AuthorityId {
        self.id
    }

    /// Whether this capability is the one identified by `owner`.
    pub fn grants(&self, owner: AuthorityId) -> bool {
        self.id == owner
    }
}

impl Default for Authority {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_authority_is_distinct() {
        let a = Authority::new();
        let b = Authority::new();
        assert_ne!(a.id(), b.id());
        assert!(a.grants(a.id()));
        assert!(!b.grants(a.id()));
    }
}
