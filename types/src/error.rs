//! Error taxonomy shared across crates.
//!
//! Each crate has its own `thiserror` enum; every one of them maps onto an
//! [`ErrorKind`] so callers can assert on the cause without matching
//! crate-specific variants.

use crate::amount::MathError;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Not enough balance or allowance (REIT reserves, rent, share payment, vault shares).
    InsufficientReserves,
    /// Rent payment rejected because another account holds an active lease.
    PropertyOccupied,
    /// Unknown or removed property id.
    NotFound,
    /// Owner-gated call made without the owner's capability.
    Unauthorized,
    /// Vesting period of zero, or a schedule that cannot vest.
    InvalidSchedule,
    ArithmeticOverflow,
    DivisionByZero,
    /// Zero or sub-unit amount that would move no value.
    InvalidAmount,
    /// Rejected parameter or wiring.
    InvalidConfig,
    /// Operation requires the second wiring phase to have run.
    NotConnected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InsufficientReserves => "insufficient reserves",
            Self::PropertyOccupied => "property occupied",
            Self::NotFound => "not found",
            Self::Unauthorized => "unauthorized",
            Self::InvalidSchedule => "invalid schedule",
            Self::ArithmeticOverflow => "arithmetic overflow",
            Self::DivisionByZero => "division by zero",
            Self::InvalidAmount => "invalid amount",
            Self::InvalidConfig => "invalid configuration",
            Self::NotConnected => "not connected",
        };
        f.write_str(s)
    }
}

impl From<MathError> for ErrorKind {
    fn from(e: MathError) -> Self {
        match e {
            MathError::Overflow => Self::ArithmeticOverflow,
            MathError::DivisionByZero => Self::DivisionByZero,
        }
    }
}
