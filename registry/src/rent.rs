//! Rent-cycle state machine.
//!
//! Each property is either vacant or occupied:
//!
//! - **Vacant → Occupied**: any account pays rent.
//! - **Occupied → Occupied**: the current renter pays again before the lease
//!   lapses; the lease end moves forward by one cycle.
//! - **Occupied → Vacant**: an [`upkeep`](RentCycleEngine::upkeep) tick
//!   observes `now > lease_ends`.
//!
//! Expiry is lazy. Between the moment a lease lapses and the next tick,
//! the property still reads as occupied. A rent payment in that window is
//! not blocked by the lapsed tenancy: it starts a fresh lease for the payer.

use crate::error::RegistryError;
use crate::property::Lease;
use crate::registry::PropertyRegistry;
use reit_ledger::FungibleLedger;
use reit_types::{AccountId, Authority, AuthorityId, PropertyId, Timestamp, SECS_PER_DAY};
use reit_utils::format_duration;
use serde::{Deserialize, Serialize};

/// Lease length shared by every property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentCycleConfig {
    pub rent_cycle_secs: u64,
}

impl RentCycleConfig {
    /// The cycle length in whole days, rounded down.
    pub fn rent_cycle_days(&self) -> u64 {
        self.rent_cycle_secs / SECS_PER_DAY
    }
}

impl Default for RentCycleConfig {
    fn default() -> Self {
        Self {
            rent_cycle_secs: 30 * SECS_PER_DAY,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaseEvent {
    /// A new tenancy on a vacant (or lapsed) property.
    Started,
    /// The sitting renter extended their lease.
    Renewed,
}

/// Outcome of an accepted rent payment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentReceipt {
    pub id: PropertyId,
    pub payer: AccountId,
    pub recipient: AccountId,
    pub amount: u128,
    pub lease_ends: Timestamp,
    pub event: LeaseEvent,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacatedLease {
    pub id: PropertyId,
    pub former_renter: AccountId,
    pub lease_ended: Timestamp,
}

/// What one upkeep tick did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpkeepReport {
    pub checked: usize,
    pub vacated: Vec<VacatedLease>,
}

pub struct RentCycleEngine {
    owner: AuthorityId,
    config: RentCycleConfig,
}

impl RentCycleEngine {
    pub fn new(owner: &Authority, config: RentCycleConfig) -> Result<Self, RegistryError> {
        if config.rent_cycle_secs == 0 {
            return Err(RegistryError::ZeroRentCycle);
        }
        Ok(Self {
            owner: owner.id(),
            config,
        })
    }

    pub fn config(&self) -> RentCycleConfig {
        self.config
    }

    pub fn rent_cycle_secs(&self) -> u64 {
        self.config.rent_cycle_secs
    }

    /// Change the lease length. Applies to leases started or renewed afterwards.
    pub fn set_rent_cycle_length(&mut self, auth: &Authority, secs: u64) -> Result<(), RegistryError> {
        if !auth.grants(self.owner) {
            return Err(RegistryError::Unauthorized);
        }
        if secs == 0 {
            return Err(RegistryError::ZeroRentCycle);
        }
        tracing::info!(
            before = %format_duration(self.config.rent_cycle_secs),
            after = %format_duration(secs),
            "rent cycle length updated"
        );
        self.config.rent_cycle_secs = secs;
        Ok(())
    }

    /// Pay one cycle of rent on property `id`.
    ///
    /// The registry's account spends `payer`'s stablecoin allowance, so the
    /// payer must have approved at least the rent price to it. On any error
    /// neither the ledger nor the registry has changed.
    pub fn pay_rent<L: FungibleLedger + ?Sized>(
        &self,
        registry: &mut PropertyRegistry,
        stablecoin: &mut L,
        payer: &AccountId,
        id: PropertyId,
        now: Timestamp,
    ) -> Result<RentReceipt, RegistryError> {
        let cycle = self.config.rent_cycle_secs;
        let property = registry.get(id)?;

        let (lease, event) = match property.lease() {
            Some(current) if !current.has_lapsed(now) => {
                if &current.renter != payer {
                    tracing::warn!(
                        id,
                        payer = %payer,
                        renter = %current.renter,
                        lease_ends = %current.lease_ends,
                        "rent rejected: property occupied"
                    );
                    return Err(RegistryError::PropertyOccupied {
                        id,
                        renter: current.renter.clone(),
                        lease_ends: current.lease_ends,
                    });
                }
                let lease_ends = current
                    .lease_ends
                    .checked_add_secs(cycle)
                    .ok_or(RegistryError::Overflow)?;
                let renewed = Lease {
                    renter: payer.clone(),
                    started_renting_on: current.started_renting_on,
                    last_rent_payment: now,
                    lease_ends,
                };
                (renewed, LeaseEvent::Renewed)
            }
            _ => {
                let lease_ends = now.checked_add_secs(cycle).ok_or(RegistryError::Overflow)?;
                let fresh = Lease {
                    renter: payer.clone(),
                    started_renting_on: now,
                    last_rent_payment: now,
                    lease_ends,
                };
                (fresh, LeaseEvent::Started)
            }
        };

        let amount = property.rent_price();
        let recipient = registry.recipient_for(property).clone();
        stablecoin.transfer_from(registry.account(), payer, &recipient, amount)?;

        let lease_ends = lease.lease_ends;
        registry.get_mut(id)?.set_lease(lease);
        tracing::info!(
            id,
            payer = %payer,
            recipient = %recipient,
            amount,
            lease_ends = %lease_ends,
            event = ?event,
            cycle = %format_duration(cycle),
            "rent paid"
        );

        Ok(RentReceipt {
            id,
            payer: payer.clone(),
            recipient,
            amount,
            lease_ends,
            event,
        })
    }

    /// One upkeep tick: vacate every property whose lease has lapsed.
    ///
    /// Moves no funds. Safe to call any number of times.
    pub fn upkeep(&self, registry: &mut PropertyRegistry, now: Timestamp) -> UpkeepReport {
        let mut report = UpkeepReport::default();
        for property in registry.properties_mut() {
            report.checked += 1;
            let lapsed = property.lease().is_some_and(|l| l.has_lapsed(now));
            if !lapsed {
                continue;
            }
            if let Some(lease) = property.take_lease() {
                tracing::info!(
                    id = property.id(),
                    renter = %lease.renter,
                    lease_ended = %lease.lease_ends,
                    overdue = %format_duration(lease.lease_ends.elapsed_since(now)),
                    "lease expired, property vacated"
                );
                report.vacated.push(VacatedLease {
                    id: property.id(),
                    former_renter: lease.renter,
                    lease_ended: lease.lease_ends,
                });
            }
        }
        if report.vacated.is_empty() {
            tracing::debug!(checked = report.checked, now = %now, "upkeep: nothing expired");
        }
        report
    }
}
