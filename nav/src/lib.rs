//! NAV engine: the REIT treasury.
//!
//! Net asset value is the stablecoin held by the REIT account plus the
//! appraised value of every property in the registry. New shares are sold
//! at the current backing per share, property acquisitions are paid out of
//! cash reserves, and collected rent is swept out as a dividend split
//! between the vesting vault and the profits wallet.

pub mod dividend;
pub mod engine;
pub mod error;

pub use dividend::{Dividend, DividendSplit};
pub use engine::{NavEngine, NavWiring, Purchase};
pub use error::NavError;
