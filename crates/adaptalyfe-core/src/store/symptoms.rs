//! Symptom journal.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{decode_record, encode_record, scoped_key, scoped_prefix};
use crate::error::Error;

const SYMPTOMS_TREE: &[u8] = b"symptoms";

/// One journal entry describing how a user felt on a day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomEntry {
    /// Stable identifier.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Day the entry describes.
    pub recorded_on: NaiveDate,
    /// Severity on a 1-10 scale.
    pub severity: u8,
    /// Free-form notes.
    pub notes: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Store for symptom entries, keyed by owner.
#[derive(Clone)]
pub struct SymptomStore {
    tree: sled::Tree,
}

impl SymptomStore {
    pub(crate) fn open(db: &sled::Db) -> Result<Self, Error> {
        Ok(Self {
            tree: db.open_tree(SYMPTOMS_TREE)?,
        })
    }

    /// Record an entry. Severity must fall in 1-10.
    pub fn create(
        &self,
        user_id: &str,
        recorded_on: NaiveDate,
        severity: u8,
        notes: &str,
    ) -> Result<SymptomEntry, Error> {
        if !(1..=10).contains(&severity) {
            return Err(Error::InvalidData(format!(
                "severity {} is outside 1-10",
                severity
            )));
        }

        let entry = SymptomEntry {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            recorded_on,
            severity,
            notes: notes.to_string(),
            created_at: Utc::now(),
        };

        self.tree
            .insert(scoped_key(user_id, &entry.id), encode_record(&entry)?)?;
        Ok(entry)
    }

    /// Get one of a user's entries.
    pub fn get(&self, user_id: &str, entry_id: &str) -> Result<Option<SymptomEntry>, Error> {
        match self.tree.get(scoped_key(user_id, entry_id))? {
            Some(bytes) => Ok(Some(decode_record(&bytes)?)),
            None => Ok(None),
        }
    }

    /// List all of a user's entries.
    pub fn list_for_user(&self, user_id: &str) -> Result<Vec<SymptomEntry>, Error> {
        let mut entries = Vec::new();
        for result in self.tree.scan_prefix(scoped_prefix(user_id)) {
            let (_, bytes) = result?;
            entries.push(decode_record(&bytes)?);
        }
        Ok(entries)
    }

    /// Delete an entry. Returns whether anything was removed.
    pub fn delete(&self, user_id: &str, entry_id: &str) -> Result<bool, Error> {
        Ok(self.tree.remove(scoped_key(user_id, entry_id))?.is_some())
    }
}
