//! Dividend split between the vesting vault and the profits wallet.

use crate::error::NavError;
use reit_types::params::BPS_DENOMINATOR;
use reit_types::{mul_div_floor, AccountId};
use serde::{Deserialize, Serialize};

/// Share of every dividend kept as operator profit, in basis points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividendSplit {
    profit_bps: u32,
}

impl DividendSplit {
    pub fn new(profit_bps: u32) -> Result<Self, NavError> {
        if profit_bps > BPS_DENOMINATOR {
            return Err(NavError::InvalidSplit(profit_bps));
        }
        Ok(Self { profit_bps })
    }

    pub fn profit_bps(&self) -> u32 {
        self.profit_bps
    }

    /// `(to_vault, to_profits)`. The profit share rounds down; the vault
    /// gets the remainder, so nothing is lost.
    pub fn split(&self, amount: u128) -> Result<(u128, u128), NavError> {
        let to_profits = mul_div_floor(amount, u128::from(self.profit_bps), u128::from(BPS_DENOMINATOR))?;
        Ok((amount - to_profits, to_profits))
    }
}

impl Default for DividendSplit {
    /// 90% vault, 10% profits.
    fn default() -> Self {
        Self { profit_bps: 1_000 }
    }
}

/// One executed dividend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dividend {
    pub total: u128,
    pub vault: AccountId,
    pub to_vault: u128,
    pub profits_wallet: AccountId,
    pub to_profits: u128,
}
