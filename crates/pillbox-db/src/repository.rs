use std::sync::Arc;

use serde_json::Value;

use pillbox_types::models::Prescription;

use crate::error::Result;
use crate::filter::{Collection, Field, PrescriptionFilter, UserFilter};
use crate::models::{PrescriptionChanges, PrescriptionDraft, UserRecord};
use crate::DocumentStore;

/// Owner-scoped access to the prescriptions collection. Every lookup and
/// write is filtered by the acting owner.
#[derive(Clone)]
pub struct PrescriptionRepository {
    store: Arc<dyn DocumentStore>,
}

impl PrescriptionRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn create(&self, owner: &str, draft: PrescriptionDraft) -> Result<Prescription> {
        let prescription = Prescription {
            id: self.store.new_id(),
            name: draft.name,
            directions: draft.directions,
            time: draft.time,
            owner: owner.to_string(),
        };

        let doc = serde_json::to_value(&prescription)?;
        self.store
            .insert(Collection::Prescriptions, &prescription.id, &doc)?;

        Ok(prescription)
    }

    pub fn find_owned(&self, id: &str, owner: &str) -> Result<Option<Prescription>> {
        self.store
            .find_one(&PrescriptionFilter::by_id_and_owner(id, owner))?
            .map(decode)
            .transpose()
    }

    pub fn list_owned(&self, owner: &str) -> Result<Vec<Prescription>> {
        self.store
            .find_all(&PrescriptionFilter::by_owner(owner))?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Apply `changes` and re-stamp the owner. Returns the stored record, or
    /// `None` when `owner` has no prescription with this id.
    pub fn update_owned(
        &self,
        id: &str,
        owner: &str,
        changes: PrescriptionChanges,
    ) -> Result<Option<Prescription>> {
        let mut set = Vec::with_capacity(4);
        if let Some(name) = changes.name {
            set.push((Field::Name, Value::String(name)));
        }
        if let Some(directions) = changes.directions {
            set.push((Field::Directions, Value::String(directions)));
        }
        if let Some(time) = changes.time {
            set.push((Field::Time, Value::String(time)));
        }
        set.push((Field::Owner, Value::String(owner.to_string())));

        let filter = PrescriptionFilter::by_id_and_owner(id, owner);
        if !self.store.update(&filter, &set)? {
            return Ok(None);
        }

        self.store.find_one(&filter)?.map(decode).transpose()
    }

    pub fn delete_owned(&self, id: &str, owner: &str) -> Result<bool> {
        self.store
            .remove(&PrescriptionFilter::by_id_and_owner(id, owner))
    }
}

fn decode(doc: Value) -> Result<Prescription> {
    Ok(serde_json::from_value(doc)?)
}

#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Fails with `StoreError::Duplicate` when the username is taken.
    pub fn create(&self, username: &str, password_hash: &str) -> Result<UserRecord> {
        let user = UserRecord {
            id: self.store.new_id(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };

        let doc = serde_json::to_value(&user)?;
        self.store.insert(Collection::Users, &user.id, &doc)?;

        Ok(user)
    }

    pub fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        match self.store.find_one(&UserFilter::by_username(username))? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }
}
