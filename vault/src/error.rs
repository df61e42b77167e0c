//! Vault errors.

use reit_ledger::LedgerError;
use reit_types::{AccountId, ErrorKind, MathError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("deposit of {0} would mint zero shares")]
    ZeroShares(u128),

    #[error("{owner} holds {available} shares, needs {needed}")]
    InsufficientShares {
        owner: AccountId,
        needed: u128,
        available: u128,
    },

    #[error("share allowance too low: need {needed}, have {available}")]
    InsufficientShareAllowance { needed: u128, available: u128 },

    #[error("vault holds {balance} but has committed {committed}")]
    Insolvent { balance: u128, committed: u128 },

    #[error("caller does not hold the vault owner capability")]
    Unauthorized,

    #[error("invalid vesting schedule: {0}")]
    InvalidSchedule(String),

    #[error("vault holds {expected}, ledger is {actual}")]
    AssetMismatch { expected: String, actual: String },

    #[error("vesting precision must be non-zero")]
    ZeroPrecision,

    #[error(transparent)]
    Math(#[from] MathError),

    #[error("asset transfer failed: {0}")]
    Ledger(#[from] LedgerError),
}

impl VaultError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ZeroAmount | Self::ZeroShares(_) => ErrorKind::InvalidAmount,
            Self::InsufficientShares { .. }
            | Self::InsufficientShareAllowance { .. }
            | Self::Insolvent { .. } => ErrorKind::InsufficientReserves,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::InvalidSchedule(_) => ErrorKind::InvalidSchedule,
            Self::AssetMismatch { .. } | Self::ZeroPrecision => ErrorKind::InvalidConfig,
            Self::Math(e) => (*e).into(),
            Self::Ledger(e) => e.kind(),
        }
    }
}
