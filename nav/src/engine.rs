//! Treasury accounting and share issuance.
//!
//! Units: cash and appraisals are raw stablecoin units; share amounts are
//! raw share-token units. Backing per share is `nav * 10^share_decimals /
//! circulating_shares`, the stablecoin units behind `10^share_decimals` raw
//! shares. The two tokens' decimals may differ; a purchase of `n` raw shares
//! costs `n * backing / 10^share_decimals` raw stablecoin units.

use crate::dividend::{Dividend, DividendSplit};
use crate::error::NavError;
use reit_ledger::FungibleLedger;
use reit_registry::{PriceChange, Property, PropertyRegistry};
use reit_types::{mul_div_floor, AccountId, Authority, AuthorityId, MathError, PropertyId};
use reit_vault::VestingVault;
use serde::{Deserialize, Serialize};

/// Accounts the engine learns in the second wiring phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavWiring {
    pub registry: AccountId,
    pub vault: AccountId,
}

/// One executed share purchase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub buyer: AccountId,
    pub shares: u128,
    pub cost: u128,
    /// Backing per whole share the purchase was priced at.
    pub backing_per_share: u128,
}

pub struct NavEngine {
    owner: AuthorityId,
    account: AccountId,
    operations_wallet: AccountId,
    profits_wallet: AccountId,
    split: DividendSplit,
    /// Issue price while no shares circulate, in raw stablecoin units per raw share.
    bootstrap_share_price: u128,
    wiring: Option<NavWiring>,
}

impl NavEngine {
    pub fn new(
        owner: &Authority,
        account: AccountId,
        operations_wallet: AccountId,
        profits_wallet: AccountId,
        split: DividendSplit,
        bootstrap_share_price: u128,
    ) -> Result<Self, NavError> {
        if bootstrap_share_price == 0 {
            return Err(NavError::ZeroBootstrapPrice);
        }
        for wallet in [&account, &operations_wallet, &profits_wallet] {
            if !wallet.is_valid() {
                return Err(NavError::InvalidAccount(wallet.clone()));
            }
        }
        Ok(Self {
            owner: owner.id(),
            account,
            operations_wallet,
            profits_wallet,
            split,
            bootstrap_share_price,
            wiring: None,
        })
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn operations_wallet(&self) -> &AccountId {
        &self.operations_wallet
    }

    pub fn profits_wallet(&self) -> &AccountId {
        &self.profits_wallet
    }

    pub fn split(&self) -> DividendSplit {
        self.split
    }

    pub fn wiring(&self) -> Option<&NavWiring> {
        self.wiring.as_ref()
    }

    fn authorize(&self, auth: &Authority) -> Result<(), NavError> {
        if auth.grants(self.owner) {
            Ok(())
        } else {
            Err(NavError::Unauthorized)
        }
    }

    fn wired(&self) -> Result<&NavWiring, NavError> {
        self.wiring.as_ref().ok_or(NavError::NotConnected)
    }

    fn check_registry(&self, registry: &PropertyRegistry) -> Result<(), NavError> {
        let wiring = self.wired()?;
        if &wiring.registry != registry.account() {
            return Err(NavError::RegistryMismatch {
                expected: wiring.registry.clone(),
                actual: registry.account().clone(),
            });
        }
        Ok(())
    }

    /// Second wiring phase. The vault must hold the stablecoin, since that
    /// is what dividends pay out in.
    pub fn connect<L: FungibleLedger + ?Sized>(
        &mut self,
        auth: &Authority,
        registry: &PropertyRegistry,
        vault: &VestingVault,
        stablecoin: &L,
    ) -> Result<(), NavError> {
        self.authorize(auth)?;
        if vault.asset_symbol() != stablecoin.symbol() {
            return Err(NavError::AssetMismatch {
                vault: vault.asset_symbol().to_owned(),
                stablecoin: stablecoin.symbol().to_owned(),
            });
        }
        let wiring = NavWiring {
            registry: registry.account().clone(),
            vault: vault.account().clone(),
        };
        tracing::info!(registry = %wiring.registry, vault = %wiring.vault, "REIT connected");
        self.wiring = Some(wiring);
        Ok(())
    }

    // ── valuation ──────────────────────────────────────────────────────

    pub fn cash_reserves<L: FungibleLedger + ?Sized>(&self, stablecoin: &L) -> u128 {
        stablecoin.balance_of(&self.account)
    }

    /// Σ appraisal price: property value only.
    pub fn total_assets(&self, registry: &PropertyRegistry) -> Result<u128, NavError> {
        Ok(registry.total_appraisal()?)
    }

    /// Σ rent price over every property, occupied or not.
    pub fn total_rent(&self, registry: &PropertyRegistry) -> Result<u128, NavError> {
        Ok(registry.total_rent()?)
    }

    pub fn number_of_properties(&self, registry: &PropertyRegistry) -> usize {
        registry.count()
    }

    /// Cash reserves plus Σ appraisal price.
    pub fn nav<L: FungibleLedger + ?Sized>(
        &self,
        stablecoin: &L,
        registry: &PropertyRegistry,
    ) -> Result<u128, NavError> {
        self.cash_reserves(stablecoin)
            .checked_add(self.total_assets(registry)?)
            .ok_or(NavError::Math(MathError::Overflow))
    }

    /// Stablecoin units backing one whole share.
    ///
    /// With no shares in circulation this is the bootstrap price
    /// (`bootstrap_share_price * 10^share_decimals`), so one raw share costs
    /// `bootstrap_share_price` raw stablecoin units.
    pub fn backing_per_share<S, T>(
        &self,
        stablecoin: &S,
        shares: &T,
        registry: &PropertyRegistry,
    ) -> Result<u128, NavError>
    where
        S: FungibleLedger + ?Sized,
        T: FungibleLedger + ?Sized,
    {
        let circulating = shares.total_supply();
        if circulating == 0 {
            return self
                .bootstrap_share_price
                .checked_mul(shares.unit()?)
                .ok_or(NavError::Math(MathError::Overflow));
        }
        let nav = self.nav(stablecoin, registry)?;
        Ok(mul_div_floor(nav, shares.unit()?, circulating)?)
    }

    // ── treasury operations ────────────────────────────────────────────

    /// Sell `share_amount` new shares to `buyer` at the current backing.
    ///
    /// `buyer` must have approved the REIT account for the stablecoin cost.
    pub fn buy<S, T>(
        &self,
        stablecoin: &mut S,
        shares: &mut T,
        registry: &PropertyRegistry,
        buyer: &AccountId,
        share_amount: u128,
    ) -> Result<Purchase, NavError>
    where
        S: FungibleLedger + ?Sized,
        T: FungibleLedger + ?Sized,
    {
        self.check_registry(registry)?;
        if share_amount == 0 {
            return Err(NavError::ZeroAmount);
        }
        let backing = self.backing_per_share(stablecoin, shares, registry)?;
        let cost = mul_div_floor(share_amount, backing, shares.unit()?)?;
        if cost == 0 {
            return Err(NavError::ZeroCost { shares: share_amount });
        }
        shares
            .total_supply()
            .checked_add(share_amount)
            .ok_or(MathError::Overflow)?;
        shares
            .balance_of(buyer)
            .checked_add(share_amount)
            .ok_or(MathError::Overflow)?;

        stablecoin.transfer_from(&self.account, buyer, &self.account, cost)?;
        if let Err(e) = shares.mint(buyer, share_amount) {
            // Issuance failed after payment. If the refund fails too, the
            // cost stays in reserves with no shares issued.
            if let Err(refund) = stablecoin.transfer(&self.account, buyer, cost) {
                tracing::error!(
                    buyer = %buyer,
                    cost,
                    error = %e,
                    refund_error = %refund,
                    "share mint failed and refund failed"
                );
            } else {
                tracing::warn!(buyer = %buyer, cost, error = %e, "share mint failed, payment refunded");
            }
            return Err(e.into());
        }

        tracing::info!(
            buyer = %buyer,
            shares = share_amount,
            cost,
            backing_per_share = backing,
            "shares issued"
        );
        Ok(Purchase {
            buyer: buyer.clone(),
            shares: share_amount,
            cost,
            backing_per_share: backing,
        })
    }

    /// Acquire a property out of cash reserves.
    ///
    /// The purchase price is paid to the operations wallet and the
    /// certificate is minted to the REIT account. Every mint check runs
    /// before any cash moves.
    pub fn add_property<L: FungibleLedger + ?Sized>(
        &self,
        auth: &Authority,
        stablecoin: &mut L,
        registry: &mut PropertyRegistry,
        metadata_uri: impl Into<String>,
        rent_price: u128,
        purchase_price: u128,
    ) -> Result<PropertyId, NavError> {
        self.authorize(auth)?;
        self.check_registry(registry)?;
        if !registry.is_owner(auth) {
            return Err(NavError::Unauthorized);
        }
        registry.check_mint(auth, &self.account)?;
        let available = self.cash_reserves(stablecoin);
        if available < purchase_price {
            return Err(NavError::InsufficientReserves {
                needed: purchase_price,
                available,
            });
        }

        stablecoin.transfer(&self.account, &self.operations_wallet, purchase_price)?;
        let id = registry.mint(auth, self.account.clone(), metadata_uri, rent_price, purchase_price)?;
        tracing::info!(
            id,
            purchase_price,
            rent_price,
            reserves_left = available - purchase_price,
            "property acquired"
        );
        Ok(id)
    }

    pub fn remove_property(
        &self,
        auth: &Authority,
        registry: &mut PropertyRegistry,
        id: PropertyId,
    ) -> Result<Property, NavError> {
        self.authorize(auth)?;
        self.check_registry(registry)?;
        Ok(registry.burn(auth, id)?)
    }

    pub fn appraise(
        &self,
        auth: &Authority,
        registry: &mut PropertyRegistry,
        id: PropertyId,
        price: u128,
    ) -> Result<PriceChange, NavError> {
        self.authorize(auth)?;
        self.check_registry(registry)?;
        Ok(registry.appraise(auth, id, price)?)
    }

    /// Sweep the REIT's whole stablecoin balance out as a dividend.
    ///
    /// The vault's share only becomes visible to vault holders after its
    /// next vesting-schedule update.
    pub fn send_dividend<L: FungibleLedger + ?Sized>(&self, stablecoin: &mut L) -> Result<Dividend, NavError> {
        let vault = self.wired()?.vault.clone();
        let total = self.cash_reserves(stablecoin);
        let (to_vault, to_profits) = self.split.split(total)?;
        let dividend = Dividend {
            total,
            vault,
            to_vault,
            profits_wallet: self.profits_wallet.clone(),
            to_profits,
        };
        if total == 0 {
            tracing::debug!("dividend skipped: no cash reserves");
            return Ok(dividend);
        }

        stablecoin.transfer(&self.account, &dividend.vault, to_vault)?;
        if let Err(e) = stablecoin.transfer(&self.account, &self.profits_wallet, to_profits) {
            // Claw the vault share back. If that fails too, the vault keeps
            // it and the profits share stays in reserves.
            if let Err(clawback) = stablecoin.transfer(&dividend.vault, &self.account, to_vault) {
                tracing::error!(
                    to_vault,
                    to_profits,
                    error = %e,
                    clawback_error = %clawback,
                    "dividend failed and vault share could not be reclaimed"
                );
            } else {
                tracing::warn!(to_vault, to_profits, error = %e, "dividend failed, vault share reclaimed");
            }
            return Err(e.into());
        }
        tracing::info!(total, to_vault, to_profits, "dividend sent");
        Ok(dividend)
    }
}
