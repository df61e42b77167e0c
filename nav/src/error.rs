//! NAV engine errors.

use reit_ledger::LedgerError;
use reit_registry::RegistryError;
use reit_types::{AccountId, ErrorKind, MathError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavError {
    #[error("insufficient cash reserves: need {needed}, have {available}")]
    InsufficientReserves { needed: u128, available: u128 },

    #[error("caller does not hold the REIT owner capability")]
    Unauthorized,

    #[error("REIT is not connected to a registry and vault")]
    NotConnected,

    #[error("REIT is wired to registry {expected}, got {actual}")]
    RegistryMismatch { expected: AccountId, actual: AccountId },

    #[error("vault holds {vault}, dividends are paid in {stablecoin}")]
    AssetMismatch { vault: String, stablecoin: String },

    #[error("dividend profit share {0} bps exceeds 10000")]
    InvalidSplit(u32),

    #[error("invalid account id '{0}'")]
    InvalidAccount(AccountId),

    #[error("bootstrap share price must be non-zero")]
    ZeroBootstrapPrice,

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("{shares} shares cost nothing at the current backing")]
    ZeroCost { shares: u128 },

    #[error(transparent)]
    Math(#[from] MathError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("treasury transfer failed: {0}")]
    Ledger(#[from] LedgerError),
}

impl NavError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientReserves { .. } => ErrorKind::InsufficientReserves,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::NotConnected => ErrorKind::NotConnected,
            Self::RegistryMismatch { .. }
            | Self::AssetMismatch { .. }
            | Self::InvalidSplit(_)
            | Self::InvalidAccount(_)
            | Self::ZeroBootstrapPrice => ErrorKind::InvalidConfig,
            Self::ZeroAmount | Self::ZeroCost { .. } => ErrorKind::InvalidAmount,
            Self::Math(e) => (*e).into(),
            Self::Registry(e) => e.kind(),
            Self::Ledger(e) => e.kind(),
        }
    }
}
