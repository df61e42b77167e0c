use reit_types::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("insufficient allowance: need {needed}, have {available}")]
    InsufficientAllowance { needed: u128, available: u128 },

    #[error("arithmetic overflow in ledger")]
    Overflow,

    #[error("ledger backend error: {0}")]
    Backend(String),
}

impl LedgerError {
    /// A refused movement of funds reads as missing reserves to the caller.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Overflow => ErrorKind::ArithmeticOverflow,
            Self::InsufficientBalance { .. }
            | Self::InsufficientAllowance { .. }
            | Self::Backend(_) => ErrorKind::InsufficientReserves,
        }
    }
}
