//! Property registry and rent-cycle engine.
//!
//! The [`PropertyRegistry`] owns every property certificate: prices, metadata
//! and the current lease. The [`RentCycleEngine`] drives each property through
//! its two occupancy states. Rent payments move stablecoin through the
//! [`FungibleLedger`](reit_ledger::FungibleLedger) seam, and the daily
//! [`upkeep`](RentCycleEngine::upkeep) tick clears leases that have lapsed.

pub mod error;
pub mod property;
pub mod registry;
pub mod rent;

pub use error::RegistryError;
pub use property::{Lease, Property};
pub use registry::{PriceChange, PropertyRegistry};
pub use rent::{LeaseEvent, RentCycleConfig, RentCycleEngine, RentReceipt, UpkeepReport, VacatedLease};
