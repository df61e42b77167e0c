//! The property registry: certificates, prices and the rent recipient.

use crate::error::RegistryError;
use crate::property::Property;
use reit_types::{AccountId, Authority, AuthorityId, PropertyId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Old and new value of an owner price update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceChange {
    pub id: PropertyId,
    pub before: u128,
    pub after: u128,
}

/// Owns every property. Ids start at 1 and are never reused, even after a burn.
pub struct PropertyRegistry {
    owner: AuthorityId,
    /// The registry's own ledger account; renters approve it to pull rent.
    account: AccountId,
    properties: BTreeMap<PropertyId, Property>,
    next_id: PropertyId,
    /// Where rent goes once wired to a REIT. `None` sends rent to the
    /// certificate holder.
    rent_recipient: Option<AccountId>,
}

impl PropertyRegistry {
    pub fn new(owner: &Authority, account: AccountId) -> Self {
        Self {
            owner: owner.id(),
            account,
            properties: BTreeMap::new(),
            next_id: 1,
            rent_recipient: None,
        }
    }

    pub fn owner(&self) -> AuthorityId {
        self.owner
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn is_owner(&self, auth: &Authority) -> bool {
        auth.grants(self.owner)
    }

    fn authorize(&self, auth: &Authority) -> Result<(), RegistryError> {
        if self.is_owner(auth) {
            Ok(())
        } else {
            Err(RegistryError::Unauthorized)
        }
    }

    /// Second wiring phase: route every future rent payment to `recipient`.
    pub fn connect(&mut self, auth: &Authority, recipient: AccountId) -> Result<(), RegistryError> {
        self.authorize(auth)?;
        if !recipient.is_valid() {
            return Err(RegistryError::InvalidAccount(recipient));
        }
        tracing::info!(recipient = %recipient, "registry connected to rent recipient");
        self.rent_recipient = Some(recipient);
        Ok(())
    }

    pub fn rent_recipient(&self) -> Option<&AccountId> {
        self.rent_recipient.as_ref()
    }

    /// Account that receives rent for `property`.
    pub fn recipient_for<'a>(&'a self, property: &'a Property) -> &'a AccountId {
        self.rent_recipient.as_ref().unwrap_or(property.holder())
    }

    /// Run every check [`mint`](Self::mint) performs without minting.
    ///
    /// Returns the id the next certificate would receive.
    pub fn check_mint(&self, auth: &Authority, holder: &AccountId) -> Result<PropertyId, RegistryError> {
        self.authorize(auth)?;
        if !holder.is_valid() {
            return Err(RegistryError::InvalidAccount(holder.clone()));
        }
        self.next_id.checked_add(1).ok_or(RegistryError::Overflow)?;
        Ok(self.next_id)
    }

    /// Mint a new certificate to `holder`. Appraisal starts at the purchase price.
    pub fn mint(
        &mut self,
        auth: &Authority,
        holder: AccountId,
        metadata_uri: impl Into<String>,
        rent_price: u128,
        purchase_price: u128,
    ) -> Result<PropertyId, RegistryError> {
        let id = self.check_mint(auth, &holder)?;
        let next = id + 1;
        let property = Property::new(id, holder, metadata_uri.into(), rent_price, purchase_price);
        tracing::info!(
            id,
            holder = %property.holder(),
            rent_price,
            purchase_price,
            "property minted"
        );
        self.properties.insert(id, property);
        self.next_id = next;
        Ok(id)
    }

    /// Remove a property. Its id stays retired.
    pub fn burn(&mut self, auth: &Authority, id: PropertyId) -> Result<Property, RegistryError> {
        self.authorize(auth)?;
        let property = self.properties.remove(&id).ok_or(RegistryError::NotFound(id))?;
        tracing::info!(id, appraisal_price = property.appraisal_price(), "property burned");
        Ok(property)
    }

    pub fn set_rent(
        &mut self,
        auth: &Authority,
        id: PropertyId,
        price: u128,
    ) -> Result<PriceChange, RegistryError> {
        self.authorize(auth)?;
        let before = self.get_mut(id)?.set_rent_price(price);
        tracing::info!(id, before, after = price, "rent price updated");
        Ok(PriceChange { id, before, after: price })
    }

    pub fn set_appraisal(
        &mut self,
        auth: &Authority,
        id: PropertyId,
        price: u128,
    ) -> Result<PriceChange, RegistryError> {
        self.authorize(auth)?;
        let before = self.get_mut(id)?.set_appraisal_price(price);
        tracing::info!(id, before, after = price, "appraisal updated");
        Ok(PriceChange { id, before, after: price })
    }

    /// Periodic valuation update. Same contract as [`set_appraisal`](Self::set_appraisal).
    pub fn appraise(
        &mut self,
        auth: &Authority,
        id: PropertyId,
        price: u128,
    ) -> Result<PriceChange, RegistryError> {
        self.set_appraisal(auth, id, price)
    }

    pub fn get(&self, id: PropertyId) -> Result<&Property, RegistryError> {
        self.properties.get(&id).ok_or(RegistryError::NotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: PropertyId) -> Result<&mut Property, RegistryError> {
        self.properties.get_mut(&id).ok_or(RegistryError::NotFound(id))
    }

    pub(crate) fn properties_mut(&mut self) -> impl Iterator<Item = &mut Property> {
        self.properties.values_mut()
    }

    pub fn token_uri(&self, id: PropertyId) -> Result<&str, RegistryError> {
        self.properties
            .get(&id)
            .map(Property::metadata_uri)
            .ok_or(RegistryError::InvalidTokenId(id))
    }

    pub fn rent(&self, id: PropertyId) -> Result<u128, RegistryError> {
        self.get(id).map(Property::rent_price)
    }

    pub fn purchase_price(&self, id: PropertyId) -> Result<u128, RegistryError> {
        self.get(id).map(Property::purchase_price)
    }

    pub fn appraisal_price(&self, id: PropertyId) -> Result<u128, RegistryError> {
        self.get(id).map(Property::appraisal_price)
    }

    pub fn occupied(&self, id: PropertyId) -> Result<bool, RegistryError> {
        self.get(id).map(Property::occupied)
    }

    pub fn renter(&self, id: PropertyId) -> Result<Option<&AccountId>, RegistryError> {
        self.get(id).map(Property::renter)
    }

    pub fn lease_ends(&self, id: PropertyId) -> Result<Option<Timestamp>, RegistryError> {
        self.get(id).map(Property::lease_ends)
    }

    pub fn started_renting_on(&self, id: PropertyId) -> Result<Option<Timestamp>, RegistryError> {
        self.get(id).map(Property::started_renting_on)
    }

    pub fn last_rent_payment(&self, id: PropertyId) -> Result<Option<Timestamp>, RegistryError> {
        self.get(id).map(Property::last_rent_payment)
    }

    /// Number of live (minted, not burned) properties.
    pub fn count(&self) -> usize {
        self.properties.len()
    }

    /// Live properties in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    /// Σ appraisal price over live properties.
    pub fn total_appraisal(&self) -> Result<u128, RegistryError> {
        self.iter().try_fold(0u128, |acc, p| {
            acc.checked_add(p.appraisal_price()).ok_or(RegistryError::Overflow)
        })
    }

    /// Σ rent price over live properties, occupied or not.
    pub fn total_rent(&self) -> Result<u128, RegistryError> {
        self.iter().try_fold(0u128, |acc, p| {
            acc.checked_add(p.rent_price()).ok_or(RegistryError::Overflow)
        })
    }
}
