//! Medication list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{decode_record, encode_record, scoped_key, scoped_prefix};
use crate::error::Error;

const MEDICATIONS_TREE: &[u8] = b"medications";

/// A medication a user takes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    /// Stable identifier.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Medication name.
    pub name: String,
    /// Dosage description ("10 mg").
    pub dosage: String,
    /// Schedule note ("with breakfast").
    pub schedule: String,
    /// Whether the medication is currently taken.
    pub active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Store for medications, keyed by owner.
#[derive(Clone)]
pub struct MedicationStore {
    tree: sled::Tree,
}

impl MedicationStore {
    pub(crate) fn open(db: &sled::Db) -> Result<Self, Error> {
        Ok(Self {
            tree: db.open_tree(MEDICATIONS_TREE)?,
        })
    }

    /// Add a medication for a user.
    pub fn create(
        &self,
        user_id: &str,
        name: &str,
        dosage: &str,
        schedule: &str,
    ) -> Result<Medication, Error> {
        let medication = Medication {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            dosage: dosage.to_string(),
            schedule: schedule.to_string(),
            active: true,
            created_at: Utc::now(),
        };

        self.put(&medication)?;
        Ok(medication)
    }

    /// Get one of a user's medications.
    pub fn get(&self, user_id: &str, medication_id: &str) -> Result<Option<Medication>, Error> {
        match self.tree.get(scoped_key(user_id, medication_id))? {
            Some(bytes) => Ok(Some(decode_record(&bytes)?)),
            None => Ok(None),
        }
    }

    /// List all of a user's medications.
    pub fn list_for_user(&self, user_id: &str) -> Result<Vec<Medication>, Error> {
        let mut medications = Vec::new();
        for result in self.tree.scan_prefix(scoped_prefix(user_id)) {
            let (_, bytes) = result?;
            medications.push(decode_record(&bytes)?);
        }
        Ok(medications)
    }

    /// Replace a medication record. Fails with [`Error::NotFound`] when it
    /// does not exist.
    pub fn update(&self, medication: &Medication) -> Result<(), Error> {
        let key = scoped_key(&medication.user_id, &medication.id);
        if !self.tree.contains_key(&key)? {
            return Err(Error::NotFound);
        }
        self.tree.insert(key, encode_record(medication)?)?;
        Ok(())
    }

    /// Delete a medication. Returns whether anything was removed.
    pub fn delete(&self, user_id: &str, medication_id: &str) -> Result<bool, Error> {
        Ok(self
            .tree
            .remove(scoped_key(user_id, medication_id))?
            .is_some())
    }

    fn put(&self, medication: &Medication) -> Result<(), Error> {
        self.tree.insert(
            scoped_key(&medication.user_id, &medication.id),
            encode_record(medication)?,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (MedicationStore, sled::Db) {
        let db = sled::Config::new().temporary(true).open().unwrap();
        let store = MedicationStore::open(&db).unwrap();
        (store, db)
    }

    #[test]
    fn test_create_update_delete() {
        let (store, _db) = test_store();

        let mut med = store
            .create("u1", "Sertraline", "50 mg", "morning")
            .unwrap();
        assert!(med.active);

        med.active = false;
        store.update(&med).unwrap();

        let fetched = store.get("u1", &med.id).unwrap().unwrap();
        assert!(!fetched.active);

        assert!(store.delete("u1", &med.id).unwrap());
        assert!(store.get("u1", &med.id).unwrap().is_none());
    }

    #[test]
    fn test_update_missing_medication() {
        let (store, _db) = test_store();

        let med = Medication {
            id: "missing".to_string(),
            user_id: "u1".to_string(),
            name: "Sertraline".to_string(),
            dosage: "50 mg".to_string(),
            schedule: "morning".to_string(),
            active: true,
            created_at: Utc::now(),
        };

        assert!(matches!(store.update(&med), Err(Error::NotFound)));
    }

    #[test]
    fn test_list_scoped_to_user() {
        let (store, _db) = test_store();

        store
            .create("u1", "Sertraline", "50 mg", "morning")
            .unwrap();
        store.create("u2", "Metformin", "500 mg", "dinner").unwrap();

        let meds = store.list_for_user("u1").unwrap();
        assert_eq!(meds.len(), 1);
        assert_eq!(meds[0].name, "Sertraline");
    }
}
