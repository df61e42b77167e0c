//! Fundamental types for the REIT accounting core.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account identifiers, checked fixed-point arithmetic, timestamps and clocks,
//! the owner capability, tunable parameters, and the error taxonomy.

pub mod address;
pub mod amount;
pub mod authority;
pub mod error;
pub mod params;
pub mod state;
pub mod time;

pub use address::AccountId;
pub use amount::{mul_div_ceil, mul_div_floor, pow10, MathError};
pub use authority::{Authority, AuthorityId};
pub use error::ErrorKind;
pub use params::ReitParams;
pub use state::{LeaseState, PropertyId};
pub use time::{Clock, SystemClock, Timestamp, SECS_PER_DAY, SECS_PER_WEEK};
