//! Fungible token ledger trait.

use crate::LedgerError;
use reit_types::{pow10, AccountId, MathError};

/// One fungible asset with a fixed decimal precision.
///
/// Every mutating call is all-or-nothing: on `Err` no balance, allowance or
/// supply has changed.
pub trait FungibleLedger {
    /// Short ticker identifying the asset (e.g. `"USDG"`).
    fn symbol(&self) -> &str;
    fn decimals(&self) -> u8;
    fn total_supply(&self) -> u128;
    fn balance_of(&self, account: &AccountId) -> u128;
    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128;

    fn mint(&mut self, to: &AccountId, amount: u128) -> Result<(), LedgerError>;
    fn burn(&mut self, from: &AccountId, amount: u128) -> Result<(), LedgerError>;
    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: u128)
        -> Result<(), LedgerError>;
    fn approve(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError>;

    /// Move `amount` from `from` to `to`, spending `spender`'s allowance over `from`.
    fn transfer_from(
        &mut self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError>;

    /// Raw units per whole token (`10^decimals`).
    fn unit(&self) -> Result<u128, MathError> {
        pow10(self.decimals())
    }
}
