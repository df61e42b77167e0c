//! The wired REIT system.

use reit_ledger::FungibleLedger;
use reit_nav::{Dividend, DividendSplit, NavEngine, Purchase};
use reit_nullables::NullClock;
use reit_registry::{
    PriceChange, Property, PropertyRegistry, RentCycleConfig, RentCycleEngine, RentReceipt,
    UpkeepReport,
};
use reit_types::{AccountId, Authority, Clock, PropertyId, Timestamp};
use reit_vault::{VestingSchedule, VestingVault};

use crate::snapshot::{SystemSnapshot, TreasurySnapshot, VaultSnapshot, SNAPSHOT_VERSION};
use crate::{ReitConfig, SystemError};

/// Every component of the REIT, wired together.
///
/// `stablecoin` backs rent, cash reserves, the vault and dividends;
/// `shares` is the REIT share token sold by [`buy`](Self::buy).
pub struct ReitSystem<L: FungibleLedger, C: Clock> {
    clock: C,
    stablecoin: L,
    shares: L,
    registry: PropertyRegistry,
    rent: RentCycleEngine,
    vault: VestingVault,
    reit: NavEngine,
}

impl<L: FungibleLedger, C: Clock> ReitSystem<L, C> {
    /// Build and wire every component. `owner` becomes the owner of each one.
    pub fn new(
        owner: &Authority,
        config: &ReitConfig,
        stablecoin: L,
        shares: L,
        clock: C,
    ) -> Result<Self, SystemError> {
        config.validate()?;
        let params = &config.params;
        let now = clock.now();

        let mut registry = PropertyRegistry::new(owner, config.registry_account.clone());
        let rent = RentCycleEngine::new(
            owner,
            RentCycleConfig {
                rent_cycle_secs: params.rent_cycle_secs,
            },
        )?;
        let vault = VestingVault::new(
            owner,
            config.vault_account.clone(),
            stablecoin.symbol(),
            u128::from(params.vesting_precision),
            now,
        )?;
        let mut reit = NavEngine::new(
            owner,
            config.reit_account.clone(),
            config.operations_wallet.clone(),
            config.profits_wallet.clone(),
            DividendSplit::new(params.dividend_profit_bps)?,
            u128::from(params.bootstrap_share_price),
        )?;

        registry.connect(owner, reit.account().clone())?;
        reit.connect(owner, &registry, &vault, &stablecoin)?;

        tracing::info!(
            stablecoin = stablecoin.symbol(),
            shares = shares.symbol(),
            reit = %reit.account(),
            now = %now,
            "REIT system wired"
        );
        Ok(Self {
            clock,
            stablecoin,
            shares,
            registry,
            rent,
            vault,
            reit,
        })
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn stablecoin(&self) -> &L {
        &self.stablecoin
    }

    /// Direct ledger access for funding accounts and approvals.
    pub fn stablecoin_mut(&mut self) -> &mut L {
        &mut self.stablecoin
    }

    pub fn shares(&self) -> &L {
        &self.shares
    }

    pub fn shares_mut(&mut self) -> &mut L {
        &mut self.shares
    }

    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    pub fn rent_engine(&self) -> &RentCycleEngine {
        &self.rent
    }

    pub fn vault(&self) -> &VestingVault {
        &self.vault
    }

    pub fn reit(&self) -> &NavEngine {
        &self.reit
    }

    // ── properties and rent ────────────────────────────────────────────

    /// Acquire a property out of cash reserves.
    pub fn add_property(
        &mut self,
        auth: &Authority,
        metadata_uri: impl Into<String>,
        rent_price: u128,
        purchase_price: u128,
    ) -> Result<PropertyId, SystemError> {
        Ok(self.reit.add_property(
            auth,
            &mut self.stablecoin,
            &mut self.registry,
            metadata_uri,
            rent_price,
            purchase_price,
        )?)
    }

    /// Mint a certificate directly to `holder`, without touching reserves.
    pub fn mint_property(
        &mut self,
        auth: &Authority,
        holder: AccountId,
        metadata_uri: impl Into<String>,
        rent_price: u128,
        purchase_price: u128,
    ) -> Result<PropertyId, SystemError> {
        Ok(self
            .registry
            .mint(auth, holder, metadata_uri, rent_price, purchase_price)?)
    }

    pub fn remove_property(&mut self, auth: &Authority, id: PropertyId) -> Result<Property, SystemError> {
        Ok(self.reit.remove_property(auth, &mut self.registry, id)?)
    }

    pub fn appraise(&mut self, auth: &Authority, id: PropertyId, price: u128) -> Result<PriceChange, SystemError> {
        Ok(self.reit.appraise(auth, &mut self.registry, id, price)?)
    }

    pub fn set_rent(&mut self, auth: &Authority, id: PropertyId, price: u128) -> Result<PriceChange, SystemError> {
        Ok(self.registry.set_rent(auth, id, price)?)
    }

    pub fn set_rent_cycle_length(&mut self, auth: &Authority, secs: u64) -> Result<(), SystemError> {
        Ok(self.rent.set_rent_cycle_length(auth, secs)?)
    }

    pub fn pay_rent(&mut self, payer: &AccountId, id: PropertyId) -> Result<RentReceipt, SystemError> {
        let now = self.clock.now();
        Ok(self
            .rent
            .pay_rent(&mut self.registry, &mut self.stablecoin, payer, id, now)?)
    }

    /// One upkeep tick at the clock's current time.
    pub fn upkeep(&mut self) -> UpkeepReport {
        let now = self.clock.now();
        self.rent.upkeep(&mut self.registry, now)
    }

    // ── treasury ───────────────────────────────────────────────────────

    pub fn buy(&mut self, buyer: &AccountId, share_amount: u128) -> Result<Purchase, SystemError> {
        Ok(self.reit.buy(
            &mut self.stablecoin,
            &mut self.shares,
            &self.registry,
            buyer,
            share_amount,
        )?)
    }

    pub fn send_dividend(&mut self) -> Result<Dividend, SystemError> {
        Ok(self.reit.send_dividend(&mut self.stablecoin)?)
    }

    pub fn cash_reserves(&self) -> u128 {
        self.reit.cash_reserves(&self.stablecoin)
    }

    pub fn nav(&self) -> Result<u128, SystemError> {
        Ok(self.reit.nav(&self.stablecoin, &self.registry)?)
    }

    /// Σ appraisal price.
    pub fn property_value(&self) -> Result<u128, SystemError> {
        Ok(self.reit.total_assets(&self.registry)?)
    }

    pub fn total_rent(&self) -> Result<u128, SystemError> {
        Ok(self.reit.total_rent(&self.registry)?)
    }

    pub fn number_of_properties(&self) -> usize {
        self.reit.number_of_properties(&self.registry)
    }

    pub fn backing_per_share(&self) -> Result<u128, SystemError> {
        Ok(self
            .reit
            .backing_per_share(&self.stablecoin, &self.shares, &self.registry)?)
    }

    // ── vault ──────────────────────────────────────────────────────────

    pub fn deposit(&mut self, caller: &AccountId, assets: u128, receiver: &AccountId) -> Result<u128, SystemError> {
        let now = self.clock.now();
        Ok(self
            .vault
            .deposit(&mut self.stablecoin, caller, assets, receiver, now)?)
    }

    /// Mint exactly `shares` vault shares; returns the assets charged.
    pub fn mint_vault_shares(
        &mut self,
        caller: &AccountId,
        shares: u128,
        receiver: &AccountId,
    ) -> Result<u128, SystemError> {
        let now = self.clock.now();
        Ok(self
            .vault
            .mint(&mut self.stablecoin, caller, shares, receiver, now)?)
    }

    pub fn withdraw(
        &mut self,
        caller: &AccountId,
        assets: u128,
        receiver: &AccountId,
        owner: &AccountId,
    ) -> Result<u128, SystemError> {
        let now = self.clock.now();
        Ok(self
            .vault
            .withdraw(&mut self.stablecoin, caller, assets, receiver, owner, now)?)
    }

    pub fn redeem(
        &mut self,
        caller: &AccountId,
        shares: u128,
        receiver: &AccountId,
        owner: &AccountId,
    ) -> Result<u128, SystemError> {
        let now = self.clock.now();
        Ok(self
            .vault
            .redeem(&mut self.stablecoin, caller, shares, receiver, owner, now)?)
    }

    pub fn approve_vault_shares(&mut self, owner: &AccountId, spender: &AccountId, shares: u128) {
        self.vault.approve(owner, spender, shares);
    }

    pub fn update_vesting_schedule(&mut self, auth: &Authority, period_secs: u64) -> Result<VestingSchedule, SystemError> {
        let now = self.clock.now();
        Ok(self
            .vault
            .update_vesting_schedule(auth, &self.stablecoin, period_secs, now)?)
    }

    pub fn vault_total_assets(&self) -> Result<u128, SystemError> {
        Ok(self.vault.total_assets(self.clock.now())?)
    }

    pub fn max_withdraw(&self, owner: &AccountId) -> Result<u128, SystemError> {
        Ok(self.vault.max_withdraw(owner, self.clock.now())?)
    }

    pub fn max_redeem(&self, owner: &AccountId) -> u128 {
        self.vault.max_redeem(owner)
    }

    pub fn balance_of_assets(&self, owner: &AccountId) -> Result<u128, SystemError> {
        Ok(self.vault.balance_of_assets(owner, self.clock.now())?)
    }

    // ── export ─────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Result<SystemSnapshot, SystemError> {
        let now = self.clock.now();
        let treasury = TreasurySnapshot {
            cash_reserves: self.cash_reserves(),
            property_value: self.property_value()?,
            nav: self.nav()?,
            total_rent: self.total_rent()?,
            circulating_shares: self.shares.total_supply(),
            backing_per_share: self.backing_per_share()?,
        };
        let vault = VaultSnapshot {
            total_supply: self.vault.total_supply(),
            total_assets: self.vault.total_assets(now)?,
            asset_balance: self.stablecoin.balance_of(self.vault.account()),
            vesting: self.vault.state().clone(),
        };
        Ok(SystemSnapshot {
            version: SNAPSHOT_VERSION,
            taken_at: now,
            treasury,
            vault,
            properties: self.registry.iter().cloned().collect(),
        })
    }
}

impl<L: FungibleLedger> ReitSystem<L, NullClock> {
    /// Run one upkeep tick per day for `days + 1` days, advancing the clock
    /// a day after each tick.
    pub fn simulate_days(&mut self, days: u64) -> Vec<UpkeepReport> {
        let mut reports = Vec::new();
        for _ in 0..=days {
            reports.push(self.upkeep());
            self.clock.advance_days(1);
        }
        let vacated: usize = reports.iter().map(|r| r.vacated.len()).sum();
        tracing::debug!(days, vacated, now = %self.clock.now(), "simulated upkeep days");
        reports
    }
}
