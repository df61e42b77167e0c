//! Nullable infrastructure for deterministic testing.
//!
//! The accounting core reaches the outside world through two seams: the
//! [`Clock`](reit_types::Clock) and the
//! [`FungibleLedger`](reit_ledger::FungibleLedger). This crate provides
//! in-memory implementations of both that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests and simulations.

pub mod clock;
pub mod ledger;

pub use clock::NullClock;
pub use ledger::NullLedger;
