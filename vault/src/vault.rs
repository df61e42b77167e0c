//! The share vault.
//!
//! Shares are tracked here; the backing asset lives on an external
//! [`FungibleLedger`] in the vault's own account. Conversions:
//!
//! - assets → shares: `assets * total_supply / total_assets`
//! - shares → assets: `shares * total_assets / total_supply`
//!
//! Both are 1:1 while no shares exist. Every conversion rounds down except
//! the shares burned by `withdraw` and the assets charged by `mint`, which
//! round up so the vault never pays out more than it holds.

use crate::error::VaultError;
use crate::state::{VestingSchedule, VestingState};
use reit_ledger::FungibleLedger;
use reit_types::{mul_div_ceil, mul_div_floor, AccountId, Authority, AuthorityId, MathError, Timestamp};
use reit_utils::format_duration;
use std::collections::{BTreeMap, HashMap};

pub struct VestingVault {
    owner: AuthorityId,
    account: AccountId,
    asset_symbol: String,
    shares: BTreeMap<AccountId, u128>,
    share_allowances: HashMap<(AccountId, AccountId), u128>,
    total_supply: u128,
    state: VestingState,
}

impl VestingVault {
    /// Create an empty vault holding `asset_symbol` in `account`.
    pub fn new(
        owner: &Authority,
        account: AccountId,
        asset_symbol: impl Into<String>,
        precision: u128,
        now: Timestamp,
    ) -> Result<Self, VaultError> {
        if precision == 0 {
            return Err(VaultError::ZeroPrecision);
        }
        Ok(Self {
            owner: owner.id(),
            account,
            asset_symbol: asset_symbol.into(),
            shares: BTreeMap::new(),
            share_allowances: HashMap::new(),
            total_supply: 0,
            state: VestingState::new(precision, now),
        })
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn asset_symbol(&self) -> &str {
        &self.asset_symbol
    }

    pub fn state(&self) -> &VestingState {
        &self.state
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn balance_of(&self, owner: &AccountId) -> u128 {
        self.shares.get(owner).copied().unwrap_or(0)
    }

    pub fn total_assets(&self, now: Timestamp) -> Result<u128, VaultError> {
        self.state.total_assets(now)
    }

    pub fn total_assets_committed(&self) -> u128 {
        self.state.total_assets_committed
    }

    pub fn free_assets_at_epoch(&self) -> u128 {
        self.state.free_assets_at_epoch
    }

    pub fn issuance_rate(&self) -> u128 {
        self.state.issuance_rate
    }

    pub fn precision(&self) -> u128 {
        self.state.precision
    }

    /// Last checkpoint: the latest schedule update, deposit or withdrawal.
    /// See [`vesting_period_starts`](Self::vesting_period_starts) for the
    /// schedule epoch.
    pub fn last_update(&self) -> Timestamp {
        self.state.last_update
    }

    pub fn vesting_period_starts(&self) -> Timestamp {
        self.state.vesting_period_starts
    }

    pub fn vesting_period_ends(&self) -> Timestamp {
        self.state.vesting_period_ends
    }

    pub fn vested_profit(&self, now: Timestamp) -> u128 {
        self.state.vested_profit(now)
    }

    // ── conversions ────────────────────────────────────────────────────

    pub fn convert_to_shares(&self, assets: u128, now: Timestamp) -> Result<u128, VaultError> {
        if self.total_supply == 0 {
            return Ok(assets);
        }
        Ok(mul_div_floor(assets, self.total_supply, self.total_assets(now)?)?)
    }

    pub fn convert_to_assets(&self, shares: u128, now: Timestamp) -> Result<u128, VaultError> {
        if self.total_supply == 0 {
            return Ok(shares);
        }
        Ok(mul_div_floor(shares, self.total_assets(now)?, self.total_supply)?)
    }

    pub fn preview_deposit(&self, assets: u128, now: Timestamp) -> Result<u128, VaultError> {
        self.convert_to_shares(assets, now)
    }

    pub fn preview_mint(&self, shares: u128, now: Timestamp) -> Result<u128, VaultError> {
        if self.total_supply == 0 {
            return Ok(shares);
        }
        Ok(mul_div_ceil(shares, self.total_assets(now)?, self.total_supply)?)
    }

    pub fn preview_withdraw(&self, assets: u128, now: Timestamp) -> Result<u128, VaultError> {
        if self.total_supply == 0 {
            return Ok(assets);
        }
        Ok(mul_div_ceil(assets, self.total_supply, self.total_assets(now)?)?)
    }

    pub fn preview_redeem(&self, shares: u128, now: Timestamp) -> Result<u128, VaultError> {
        self.convert_to_assets(shares, now)
    }

    pub fn max_withdraw(&self, owner: &AccountId, now: Timestamp) -> Result<u128, VaultError> {
        self.convert_to_assets(self.balance_of(owner), now)
    }

    pub fn max_redeem(&self, owner: &AccountId) -> u128 {
        self.balance_of(owner)
    }

    /// Assets `owner`'s shares are worth right now.
    pub fn balance_of_assets(&self, owner: &AccountId, now: Timestamp) -> Result<u128, VaultError> {
        self.convert_to_assets(self.balance_of(owner), now)
    }

    // ── share allowances ───────────────────────────────────────────────

    pub fn approve(&mut self, owner: &AccountId, spender: &AccountId, shares: u128) {
        tracing::debug!(owner = %owner, spender = %spender, shares, "vault share approval");
        self.share_allowances
            .insert((owner.clone(), spender.clone()), shares);
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        self.share_allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    // ── entry points ───────────────────────────────────────────────────

    /// Pull `assets` from `caller` and mint the corresponding shares to `receiver`.
    ///
    /// `caller` must have approved the vault account on the asset ledger.
    pub fn deposit<L: FungibleLedger + ?Sized>(
        &mut self,
        asset: &mut L,
        caller: &AccountId,
        assets: u128,
        receiver: &AccountId,
        now: Timestamp,
    ) -> Result<u128, VaultError> {
        if assets == 0 {
            return Err(VaultError::ZeroAmount);
        }
        let shares = self.preview_deposit(assets, now)?;
        if shares == 0 {
            return Err(VaultError::ZeroShares(assets));
        }
        self.enter(asset, caller, assets, shares, receiver, now)?;
        Ok(shares)
    }

    /// Mint exactly `shares` to `receiver`, pulling the (rounded-up) asset cost from `caller`.
    pub fn mint<L: FungibleLedger + ?Sized>(
        &mut self,
        asset: &mut L,
        caller: &AccountId,
        shares: u128,
        receiver: &AccountId,
        now: Timestamp,
    ) -> Result<u128, VaultError> {
        if shares == 0 {
            return Err(VaultError::ZeroAmount);
        }
        let assets = self.preview_mint(shares, now)?;
        if assets == 0 {
            return Err(VaultError::ZeroAmount);
        }
        self.enter(asset, caller, assets, shares, receiver, now)?;
        Ok(assets)
    }

    /// Send `assets` to `receiver`, burning the (rounded-up) shares from `owner`.
    ///
    /// When `caller` is not `owner`, the burn spends `caller`'s share allowance.
    pub fn withdraw<L: FungibleLedger + ?Sized>(
        &mut self,
        asset: &mut L,
        caller: &AccountId,
        assets: u128,
        receiver: &AccountId,
        owner: &AccountId,
        now: Timestamp,
    ) -> Result<u128, VaultError> {
        if assets == 0 {
            return Err(VaultError::ZeroAmount);
        }
        let shares = self.preview_withdraw(assets, now)?;
        self.exit(asset, caller, assets, shares, receiver, owner, now)?;
        Ok(shares)
    }

    /// Burn exactly `shares` from `owner`, sending the (rounded-down) assets to `receiver`.
    pub fn redeem<L: FungibleLedger + ?Sized>(
        &mut self,
        asset: &mut L,
        caller: &AccountId,
        shares: u128,
        receiver: &AccountId,
        owner: &AccountId,
        now: Timestamp,
    ) -> Result<u128, VaultError> {
        if shares == 0 {
            return Err(VaultError::ZeroAmount);
        }
        let assets = self.preview_redeem(shares, now)?;
        if assets == 0 {
            return Err(VaultError::ZeroAmount);
        }
        self.exit(asset, caller, assets, shares, receiver, owner, now)?;
        Ok(assets)
    }

    /// Start vesting everything the vault account holds beyond its
    /// committed assets, linearly over `period_secs`.
    pub fn update_vesting_schedule<L: FungibleLedger + ?Sized>(
        &mut self,
        auth: &Authority,
        asset: &L,
        period_secs: u64,
        now: Timestamp,
    ) -> Result<VestingSchedule, VaultError> {
        if !auth.grants(self.owner) {
            return Err(VaultError::Unauthorized);
        }
        self.check_asset(asset)?;
        let balance = asset.balance_of(&self.account);
        let (next, schedule) = self.state.rescheduled(balance, period_secs, now)?;
        self.state = next;
        tracing::info!(
            free_assets = schedule.free_assets,
            issuance_rate = schedule.issuance_rate,
            period = %format_duration(period_secs),
            ends = %schedule.ends,
            committed = self.state.total_assets_committed,
            "vesting schedule updated"
        );
        Ok(schedule)
    }

    fn check_asset<L: FungibleLedger + ?Sized>(&self, asset: &L) -> Result<(), VaultError> {
        if asset.symbol() != self.asset_symbol {
            return Err(VaultError::AssetMismatch {
                expected: self.asset_symbol.clone(),
                actual: asset.symbol().to_owned(),
            });
        }
        Ok(())
    }

    fn enter<L: FungibleLedger + ?Sized>(
        &mut self,
        asset: &mut L,
        caller: &AccountId,
        assets: u128,
        shares: u128,
        receiver: &AccountId,
        now: Timestamp,
    ) -> Result<(), VaultError> {
        self.check_asset(asset)?;
        let mut state = self.state.checkpointed(now)?;
        state.total_assets_committed = state
            .total_assets_committed
            .checked_add(assets)
            .ok_or(MathError::Overflow)?;
        let supply = self
            .total_supply
            .checked_add(shares)
            .ok_or(MathError::Overflow)?;
        let balance = self
            .balance_of(receiver)
            .checked_add(shares)
            .ok_or(MathError::Overflow)?;

        asset.transfer_from(&self.account, caller, &self.account, assets)?;

        self.state = state;
        self.total_supply = supply;
        self.shares.insert(receiver.clone(), balance);
        tracing::info!(
            caller = %caller,
            receiver = %receiver,
            assets,
            shares,
            total_supply = supply,
            "vault deposit"
        );
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn exit<L: FungibleLedger + ?Sized>(
        &mut self,
        asset: &mut L,
        caller: &AccountId,
        assets: u128,
        shares: u128,
        receiver: &AccountId,
        owner: &AccountId,
        now: Timestamp,
    ) -> Result<(), VaultError> {
        self.check_asset(asset)?;
        let held = self.balance_of(owner);
        if held < shares {
            return Err(VaultError::InsufficientShares {
                owner: owner.clone(),
                needed: shares,
                available: held,
            });
        }
        let remaining_allowance = if caller == owner {
            None
        } else {
            let allowed = self.allowance(owner, caller);
            if allowed < shares {
                return Err(VaultError::InsufficientShareAllowance {
                    needed: shares,
                    available: allowed,
                });
            }
            Some(if allowed == u128::MAX { allowed } else { allowed - shares })
        };
        let mut state = self.state.checkpointed(now)?;
        state.total_assets_committed = state
            .total_assets_committed
            .checked_sub(assets)
            .ok_or(VaultError::Insolvent {
                balance: state.total_assets_committed,
                committed: assets,
            })?;

        asset.transfer(&self.account, receiver, assets)?;

        self.state = state;
        self.total_supply -= shares;
        self.shares.insert(owner.clone(), held - shares);
        if let Some(left) = remaining_allowance {
            self.share_allowances
                .insert((owner.clone(), caller.clone()), left);
        }
        tracing::info!(
            caller = %caller,
            owner = %owner,
            receiver = %receiver,
            assets,
            shares,
            total_supply = self.total_supply,
            "vault withdrawal"
        );
        Ok(())
    }
}
