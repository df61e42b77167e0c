//! Property identity and occupancy state.

use serde::{Deserialize, Serialize};

/// Property identifier: 1-indexed, monotonic, never reused after removal.
pub type PropertyId = u64;

/// Occupancy of a single property in the rent cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaseState {
    /// No renter; any account may start a lease by paying rent.
    Vacant,
    /// Leased; only the current renter may renew until the lease lapses.
    Occupied,
}

impl LeaseState {
    pub fn is_occupied(&self) -> bool {
        matches!(self, Self::Occupied)
    }
}
