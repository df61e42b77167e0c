//! Registry and rent-cycle errors.

use reit_ledger::LedgerError;
use reit_types::{AccountId, ErrorKind, PropertyId, Timestamp};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("property {0} not found")]
    NotFound(PropertyId),

    #[error("invalid token id {0}")]
    InvalidTokenId(PropertyId),

    #[error("property {id} is leased to {renter} until {lease_ends}")]
    PropertyOccupied {
        id: PropertyId,
        renter: AccountId,
        lease_ends: Timestamp,
    },

    #[error("caller does not hold the registry owner capability")]
    Unauthorized,

    #[error("rent cycle length must be non-zero")]
    ZeroRentCycle,

    #[error("invalid account id '{0}'")]
    InvalidAccount(AccountId),

    #[error("arithmetic overflow in registry computation")]
    Overflow,

    #[error("rent payment failed: {0}")]
    Ledger(#[from] LedgerError),
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) | Self::InvalidTokenId(_) => ErrorKind::NotFound,
            Self::PropertyOccupied { .. } => ErrorKind::PropertyOccupied,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::ZeroRentCycle | Self::InvalidAccount(_) => ErrorKind::InvalidConfig,
            Self::Overflow => ErrorKind::ArithmeticOverflow,
            Self::Ledger(e) => e.kind(),
        }
    }
}
