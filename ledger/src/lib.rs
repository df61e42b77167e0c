//! Abstract fungible-ledger interface.
//!
//! Token balances, allowances and supply live outside the accounting core.
//! Every ledger backend (an on-chain token, an in-memory double for tests)
//! implements [`FungibleLedger`]; the rest of the codebase depends only on
//! the trait.

pub mod error;
pub mod fungible;

pub use error::LedgerError;
pub use fungible::FungibleLedger;
