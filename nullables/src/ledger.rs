//! Nullable fungible ledger: an in-memory token for testing.

use reit_ledger::{FungibleLedger, LedgerError};
use reit_types::AccountId;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// An in-memory fungible token.
///
/// Balances are kept in a `BTreeMap` so that holder iteration is ordered
/// and reproducible. Accounts can be frozen to simulate a backend that
/// refuses a movement.
#[derive(Debug, Clone)]
pub struct NullLedger {
    symbol: String,
    decimals: u8,
    total_supply: u128,
    balances: BTreeMap<AccountId, u128>,
    allowances: HashMap<(AccountId, AccountId), u128>,
    frozen: BTreeSet<AccountId>,
}

impl NullLedger {
    pub fn new(symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
            total_supply: 0,
            balances: BTreeMap::new(),
            allowances: HashMap::new(),
            frozen: BTreeSet::new(),
        }
    }

    /// Refuse every mint, burn or transfer touching `account` until unfrozen.
    pub fn freeze(&mut self, account: &AccountId) {
        self.frozen.insert(account.clone());
    }

    pub fn unfreeze(&mut self, account: &AccountId) {
        self.frozen.remove(account);
    }

    fn check_live(&self, account: &AccountId) -> Result<(), LedgerError> {
        if self.frozen.contains(account) {
            return Err(LedgerError::Backend(format!("account {account} is frozen")));
        }
        Ok(())
    }

    /// Every account with a non-zero balance, in account order.
    pub fn holders(&self) -> impl Iterator<Item = (&AccountId, u128)> {
        self.balances
            .iter()
            .filter(|(_, b)| **b > 0)
            .map(|(a, b)| (a, *b))
    }

    fn debit_check(&self, from: &AccountId, amount: u128) -> Result<(), LedgerError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        Ok(())
    }

    fn move_balance(&mut self, from: &AccountId, to: &AccountId, amount: u128) -> Result<(), LedgerError> {
        self.check_live(from)?;
        self.check_live(to)?;
        self.debit_check(from, amount)?;
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let debited = self.balance_of(from) - amount;
        self.balances.insert(from.clone(), debited);
        self.balances.insert(to.clone(), credited);
        Ok(())
    }
}

impl FungibleLedger for NullLedger {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn total_supply(&self) -> u128 {
        self.total_supply
    }

    fn balance_of(&self, account: &AccountId) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    fn mint(&mut self, to: &AccountId, amount: u128) -> Result<(), LedgerError> {
        self.check_live(to)?;
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.total_supply = supply;
        self.balances.insert(to.clone(), balance);
        Ok(())
    }

    fn burn(&mut self, from: &AccountId, amount: u128) -> Result<(), LedgerError> {
        self.check_live(from)?;
        self.debit_check(from, amount)?;
        let balance = self.balance_of(from) - amount;
        self.balances.insert(from.clone(), balance);
        self.total_supply -= amount;
        Ok(())
    }

    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: u128) -> Result<(), LedgerError> {
        self.move_balance(from, to, amount)
    }

    fn approve(&mut self, owner: &AccountId, spender: &AccountId, amount: u128) -> Result<(), LedgerError> {
        self.allowances
            .insert((owner.clone(), spender.clone()), amount);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                needed: amount,
                available: allowed,
            });
        }
        self.move_balance(from, to, amount)?;
        // An unlimited approval is never drawn down.
        if allowed != u128::MAX {
            self.allowances
                .insert((from.clone(), spender.clone()), allowed - amount);
        }
        Ok(())
    }
}
