//! Embedded storage layer.
//!
//! This module provides sled-backed stores for the application's records.
//! Each record type lives in its own tree with JSON values; records owned
//! by a user are keyed `user_id:record_id` so a single prefix scan lists
//! everything a user owns.

mod bills;
mod care_groups;
mod medications;
mod symptoms;
mod tasks;
mod users;

pub use bills::{Bill, BillStore};
pub use care_groups::{CareGroup, CareGroupResolver, CareGroupStore};
pub use medications::{Medication, MedicationStore};
pub use symptoms::{SymptomEntry, SymptomStore};
pub use tasks::{DailyTask, Frequency, TaskStore};
pub use users::{Role, User, UserStore};

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::acl::{GroupRegistry, USER_LIST_GROUP};
use crate::error::Error;

/// All application stores opened from one sled database.
#[derive(Clone)]
pub struct AppStore {
    db: sled::Db,
    /// User accounts and credentials.
    pub users: UserStore,
    /// Daily task checklists.
    pub tasks: TaskStore,
    /// Recurring bills.
    pub bills: BillStore,
    /// Medication list.
    pub medications: MedicationStore,
    /// Symptom journal.
    pub symptoms: SymptomStore,
    /// Care groups backing `USER_LIST` ACL grants.
    pub care_groups: CareGroupStore,
}

impl AppStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::from_db(sled::open(path)?)
    }

    /// Open an in-memory store that is discarded on drop.
    ///
    /// Used by tests and demo deployments.
    pub fn temporary() -> Result<Self, Error> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    /// Open all trees from an existing database handle.
    pub fn from_db(db: sled::Db) -> Result<Self, Error> {
        Ok(Self {
            users: UserStore::open(&db)?,
            tasks: TaskStore::open(&db)?,
            bills: BillStore::open(&db)?,
            medications: MedicationStore::open(&db)?,
            symptoms: SymptomStore::open(&db)?,
            care_groups: CareGroupStore::open(&db)?,
            db,
        })
    }

    /// Group registry wired to this store's care groups.
    pub fn group_registry(&self) -> GroupRegistry {
        let mut registry = GroupRegistry::new();
        registry.register(
            USER_LIST_GROUP,
            Arc::new(CareGroupResolver::new(self.care_groups.clone())),
        );
        registry
    }

    /// Probe the underlying database.
    pub fn health_check(&self) -> Result<(), Error> {
        self.db.size_on_disk()?;
        Ok(())
    }
}

/// Encode a record as JSON bytes.
pub(crate) fn encode_record<T: Serialize>(value: &T) -> Result<Vec<u8>, Error> {
    serde_json::to_vec(value).map_err(|e| Error::Serialization(e.to_string()))
}

/// Decode a record from JSON bytes.
pub(crate) fn decode_record<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(bytes).map_err(|e| Error::Deserialization(e.to_string()))
}

/// Key for a record owned by a user.
pub(crate) fn scoped_key(user_id: &str, id: &str) -> Vec<u8> {
    let mut key = scoped_prefix(user_id);
    key.extend_from_slice(id.as_bytes());
    key
}

/// Prefix covering every record owned by a user.
pub(crate) fn scoped_prefix(user_id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(user_id.len() + 1);
    key.extend_from_slice(user_id.as_bytes());
    key.push(b':');
    key
}
