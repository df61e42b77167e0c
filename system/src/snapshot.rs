//! System snapshots: the full accounting state at a point in time.
//!
//! Snapshots are plain data. They export as JSON for inspection and as
//! bincode for compact storage, and they never feed back into a running
//! system.

use reit_registry::Property;
use reit_types::Timestamp;
use reit_vault::VestingState;
use serde::{Deserialize, Serialize};

use crate::SystemError;

/// Current snapshot layout version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasurySnapshot {
    pub cash_reserves: u128,
    /// Σ appraisal price.
    pub property_value: u128,
    pub nav: u128,
    pub total_rent: u128,
    pub circulating_shares: u128,
    pub backing_per_share: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultSnapshot {
    pub total_supply: u128,
    pub total_assets: u128,
    /// Asset balance of the vault account, including unscheduled profit.
    pub asset_balance: u128,
    pub vesting: VestingState,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub version: u32,
    pub taken_at: Timestamp,
    pub treasury: TreasurySnapshot,
    pub vault: VaultSnapshot,
    /// Live properties in id order.
    pub properties: Vec<Property>,
}

impl SystemSnapshot {
    pub fn to_json(&self) -> Result<String, SystemError> {
        serde_json::to_string_pretty(self).map_err(|e| SystemError::Snapshot(e.to_string()))
    }

    pub fn from_json(s: &str) -> Result<Self, SystemError> {
        serde_json::from_str(s).map_err(|e| SystemError::Snapshot(e.to_string()))
    }

    /// Serialize the snapshot to bytes (bincode).
    pub fn to_bytes(&self) -> Result<Vec<u8>, SystemError> {
        bincode::serialize(self).map_err(|e| SystemError::Snapshot(e.to_string()))
    }

    /// Deserialize a snapshot from bytes, rejecting unknown layout versions.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SystemError> {
        let snapshot: Self =
            bincode::deserialize(bytes).map_err(|e| SystemError::Snapshot(e.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SystemError::Snapshot(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        Ok(snapshot)
    }

    pub fn occupied_count(&self) -> usize {
        self.properties.iter().filter(|p| p.occupied()).count()
    }
}
