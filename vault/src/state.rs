//! Vesting bookkeeping.
//!
//! `total_assets(now) = total_assets_committed + vested_profit(now)` where
//! `vested_profit(now) = min(free_assets_at_epoch, elapsed * issuance_rate / precision)`.
//!
//! A checkpoint folds whatever has vested so far into the committed total
//! and moves the epoch to `now`. The rate does not change, so vesting
//! continues on the remaining free assets along the same line.

use crate::error::VaultError;
use reit_types::{mul_div_floor, MathError, Timestamp};
use serde::{Deserialize, Serialize};

/// Parameters set by one vesting-schedule update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingSchedule {
    /// Unvested assets at the start of the period.
    pub free_assets: u128,
    pub issuance_rate: u128,
    pub starts: Timestamp,
    pub ends: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingState {
    /// Principal plus profit already vested as of `last_update`.
    pub total_assets_committed: u128,
    /// Profit still waiting to vest as of `last_update`.
    pub free_assets_at_epoch: u128,
    /// Vesting speed in asset units per second, scaled by `precision`.
    pub issuance_rate: u128,
    /// Last checkpoint. Deposits and withdrawals move it; schedule updates
    /// reset it to `vesting_period_starts`.
    pub last_update: Timestamp,
    /// When the current schedule was set. Checkpoints leave it alone.
    pub vesting_period_starts: Timestamp,
    /// Nominal end of the current schedule. Each checkpoint floors the
    /// vested amount, so the last unit or so of free assets can finish
    /// vesting a few seconds after this.
    pub vesting_period_ends: Timestamp,
    pub precision: u128,
}

impl VestingState {
    pub fn new(precision: u128, now: Timestamp) -> Self {
        Self {
            total_assets_committed: 0,
            free_assets_at_epoch: 0,
            issuance_rate: 0,
            last_update: now,
            vesting_period_starts: now,
            vesting_period_ends: now,
            precision,
        }
    }

    /// Profit vested since `last_update`. Zero if `now` is not after it.
    pub fn vested_profit(&self, now: Timestamp) -> u128 {
        if self.issuance_rate == 0 || self.free_assets_at_epoch == 0 {
            return 0;
        }
        let elapsed = u128::from(self.last_update.elapsed_since(now));
        match mul_div_floor(elapsed, self.issuance_rate, self.precision) {
            Ok(vested) => vested.min(self.free_assets_at_epoch),
            // A quotient beyond u128 is far beyond anything left to vest.
            Err(MathError::Overflow) => self.free_assets_at_epoch,
            Err(MathError::DivisionByZero) => 0,
        }
    }

    pub fn total_assets(&self, now: Timestamp) -> Result<u128, VaultError> {
        self.total_assets_committed
            .checked_add(self.vested_profit(now))
            .ok_or(VaultError::Math(MathError::Overflow))
    }

    /// Upper bound on `total_assets` until the next schedule update.
    pub fn ceiling(&self) -> Result<u128, VaultError> {
        self.total_assets_committed
            .checked_add(self.free_assets_at_epoch)
            .ok_or(VaultError::Math(MathError::Overflow))
    }

    /// This state with vested profit folded into the committed total.
    ///
    /// A `now` earlier than `last_update` vests nothing and keeps the epoch.
    pub fn checkpointed(&self, now: Timestamp) -> Result<Self, VaultError> {
        let vested = self.vested_profit(now);
        let mut next = self.clone();
        next.total_assets_committed = self
            .total_assets_committed
            .checked_add(vested)
            .ok_or(VaultError::Math(MathError::Overflow))?;
        next.free_assets_at_epoch = self.free_assets_at_epoch - vested;
        next.last_update = self.last_update.max(now);
        if next.free_assets_at_epoch == 0 {
            next.issuance_rate = 0;
        }
        Ok(next)
    }

    /// Restart vesting over `period_secs` on everything the vault holds
    /// beyond its committed total.
    ///
    /// `balance` is the vault's current asset balance on the ledger. The
    /// still-unvested remainder of the previous schedule is part of that
    /// surplus, so it is re-spread over the new period together with any
    /// newly arrived profit.
    pub fn rescheduled(
        &self,
        balance: u128,
        period_secs: u64,
        now: Timestamp,
    ) -> Result<(Self, VestingSchedule), VaultError> {
        if period_secs == 0 {
            return Err(VaultError::InvalidSchedule("vesting period must be non-zero".into()));
        }
        if now < self.last_update {
            return Err(VaultError::InvalidSchedule(format!(
                "schedule time {now} precedes last update {}",
                self.last_update
            )));
        }
        let mut next = self.checkpointed(now)?;
        let free = balance
            .checked_sub(next.total_assets_committed)
            .ok_or(VaultError::Insolvent {
                balance,
                committed: next.total_assets_committed,
            })?;
        let rate = mul_div_floor(free, next.precision, u128::from(period_secs))?;
        if free > 0 && rate == 0 {
            return Err(VaultError::InvalidSchedule(format!(
                "{free} units over {period_secs}s rounds to a zero issuance rate"
            )));
        }
        let ends = now.checked_add_secs(period_secs).ok_or(VaultError::Math(MathError::Overflow))?;

        next.free_assets_at_epoch = free;
        next.issuance_rate = rate;
        next.last_update = now;
        next.vesting_period_starts = now;
        next.vesting_period_ends = ends;

        let schedule = VestingSchedule {
            free_assets: free,
            issuance_rate: rate,
            starts: now,
            ends,
        };
        Ok((next, schedule))
    }
}
