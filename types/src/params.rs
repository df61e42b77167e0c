//! Tunable parameters of the REIT core.
//!
//! Every field is owner-governable; the defaults reproduce the observed
//! behaviour of the deployed system (30-day lease cycle, 90/10 dividend split,
//! $100 bootstrap share price).

use crate::time::SECS_PER_DAY;
use serde::{Deserialize, Serialize};

/// Basis-point denominator (100% = 10_000 bps).
pub const BPS_DENOMINATOR: u32 = 10_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReitParams {
    /// Length of one lease cycle in seconds. Applies to every property.
    /// Default: 30 days = 2_592_000 s.
    #[serde(default = "default_rent_cycle_secs")]
    pub rent_cycle_secs: u64,

    /// Share of each dividend sent to the profits wallet, in basis points.
    /// The vault receives the remainder. Default: 1000 (10%).
    #[serde(default = "default_dividend_profit_bps")]
    pub dividend_profit_bps: u32,

    /// Fixed-point scale of the vault's issuance rate.
    /// Default: 10^6, matching the stablecoin's decimals.
    #[serde(default = "default_vesting_precision")]
    pub vesting_precision: u64,

    /// Issuance price while no shares circulate, in raw stablecoin units per
    /// raw share unit. Backing per whole share is this times
    /// `10^share_decimals`. Default: 100.
    #[serde(default = "default_bootstrap_share_price")]
    pub bootstrap_share_price: u64,
}

fn default_rent_cycle_secs() -> u64 {
    30 * SECS_PER_DAY
}

fn default_dividend_profit_bps() -> u32 {
    1_000
}

fn default_vesting_precision() -> u64 {
    1_000_000
}

fn default_bootstrap_share_price() -> u64 {
    100
}

impl ReitParams {
    /// Check the parameters for values no component can operate with.
    pub fn validate(&self) -> Result<(), String> {
        if self.rent_cycle_secs == 0 {
            return Err("rent_cycle_secs must be non-zero".into());
        }
        if self.dividend_profit_bps > BPS_DENOMINATOR {
            return Err(format!(
                "dividend_profit_bps {} exceeds {}",
                self.dividend_profit_bps, BPS_DENOMINATOR
            ));
        }
        if self.vesting_precision == 0 {
            return Err("vesting_precision must be non-zero".into());
        }
        if self.bootstrap_share_price == 0 {
            return Err("bootstrap_share_price must be non-zero".into());
        }
        Ok(())
    }
}

impl Default for ReitParams {
    fn default() -> Self {
        Self {
            rent_cycle_secs: default_rent_cycle_secs(),
            dividend_profit_bps: default_dividend_profit_bps(),
            vesting_precision: default_vesting_precision(),
            bootstrap_share_price: default_bootstrap_share_price(),
        }
    }
}
