//! Linear-vesting share vault.
//!
//! Investors deposit the backing asset and receive vault shares. Profit sent
//! to the vault's account is not counted immediately: an owner-triggered
//! [`update_vesting_schedule`](VestingVault::update_vesting_schedule) starts
//! releasing it into `total_assets` at a constant rate over a period, so the
//! share price climbs smoothly instead of jumping on each distribution.

pub mod error;
pub mod state;
pub mod vault;

pub use error::VaultError;
pub use state::{VestingSchedule, VestingState};
pub use vault::VestingVault;
