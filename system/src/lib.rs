//! The REIT simulation driver.
//!
//! [`ReitSystem`] builds every component from a [`ReitConfig`], wires them
//! together, owns the two token ledgers and the clock, and exposes each
//! operation with `now` read from the clock. [`SystemSnapshot`] captures the
//! full accounting state for export.

pub mod config;
pub mod error;
pub mod snapshot;
pub mod system;

pub use config::ReitConfig;
pub use error::SystemError;
pub use snapshot::{SystemSnapshot, TreasurySnapshot, VaultSnapshot};
pub use system::ReitSystem;
