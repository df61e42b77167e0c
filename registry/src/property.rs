//! A single property certificate and its lease.

use reit_types::{AccountId, LeaseState, PropertyId, Timestamp};
use serde::{Deserialize, Serialize};

/// An active tenancy.
///
/// Every lease timestamp lives here, so a vacant property (no `Lease`) has
/// no renter and no lease timing by construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lease {
    pub renter: AccountId,
    /// When the current tenancy began. Unchanged by renewals.
    pub started_renting_on: Timestamp,
    pub last_rent_payment: Timestamp,
    pub lease_ends: Timestamp,
}

impl Lease {
    /// The lease still protects the property at `lease_ends` itself and
    /// lapses the second after.
    pub fn has_lapsed(&self, now: Timestamp) -> bool {
        now > self.lease_ends
    }
}

/// A property held by the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    id: PropertyId,
    holder: AccountId,
    metadata_uri: String,
    rent_price: u128,
    /// Historical cost. Never changes after minting.
    purchase_price: u128,
    /// Current fair value; feeds NAV.
    appraisal_price: u128,
    lease: Option<Lease>,
}

impl Property {
    pub(crate) fn new(
        id: PropertyId,
        holder: AccountId,
        metadata_uri: String,
        rent_price: u128,
        purchase_price: u128,
    ) -> Self {
        Self {
            id,
            holder,
            metadata_uri,
            rent_price,
            purchase_price,
            appraisal_price: purchase_price,
            lease: None,
        }
    }

    pub fn id(&self) -> PropertyId {
        self.id
    }

    /// The account holding the certificate.
    pub fn holder(&self) -> &AccountId {
        &self.holder
    }

    pub fn metadata_uri(&self) -> &str {
        &self.metadata_uri
    }

    pub fn rent_price(&self) -> u128 {
        self.rent_price
    }

    pub fn purchase_price(&self) -> u128 {
        self.purchase_price
    }

    pub fn appraisal_price(&self) -> u128 {
        self.appraisal_price
    }

    pub fn lease(&self) -> Option<&Lease> {
        self.lease.as_ref()
    }

    pub fn state(&self) -> LeaseState {
        if self.lease.is_some() {
            LeaseState::Occupied
        } else {
            LeaseState::Vacant
        }
    }

    /// Occupancy as last recorded. Stays `true` after the lease lapses
    /// until an upkeep tick observes the expiry.
    pub fn occupied(&self) -> bool {
        self.state().is_occupied()
    }

    pub fn renter(&self) -> Option<&AccountId> {
        self.lease.as_ref().map(|l| &l.renter)
    }

    pub fn started_renting_on(&self) -> Option<Timestamp> {
        self.lease.as_ref().map(|l| l.started_renting_on)
    }

    pub fn last_rent_payment(&self) -> Option<Timestamp> {
        self.lease.as_ref().map(|l| l.last_rent_payment)
    }

    pub fn lease_ends(&self) -> Option<Timestamp> {
        self.lease.as_ref().map(|l| l.lease_ends)
    }

    pub(crate) fn set_rent_price(&mut self, price: u128) -> u128 {
        std::mem::replace(&mut self.rent_price, price)
    }

    pub(crate) fn set_appraisal_price(&mut self, price: u128) -> u128 {
        std::mem::replace(&mut self.appraisal_price, price)
    }

    pub(crate) fn set_lease(&mut self, lease: Lease) {
        self.lease = Some(lease);
    }

    pub(crate) fn take_lease(&mut self) -> Option<Lease> {
        self.lease.take()
    }
}
