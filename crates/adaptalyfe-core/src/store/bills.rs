//! Recurring bills.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{decode_record, encode_record, scoped_key, scoped_prefix};
use crate::error::Error;

const BILLS_TREE: &[u8] = b"bills";

/// A recurring bill on a user's budget.
///
/// Amounts are integer cents; there is no float money anywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    /// Stable identifier.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Payee or description.
    pub name: String,
    /// Amount due, in cents.
    pub amount_cents: i64,
    /// Day of month the bill is due (1-31).
    pub due_day: u8,
    /// Whether the current cycle is paid.
    pub paid: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Store for bills, keyed by owner.
#[derive(Clone)]
pub struct BillStore {
    tree: sled::Tree,
}

impl BillStore {
    pub(crate) fn open(db: &sled::Db) -> Result<Self, Error> {
        Ok(Self {
            tree: db.open_tree(BILLS_TREE)?,
        })
    }

    /// Create a bill for a user. The due day must fall in 1-31.
    pub fn create(
        &self,
        user_id: &str,
        name: &str,
        amount_cents: i64,
        due_day: u8,
    ) -> Result<Bill, Error> {
        if !(1..=31).contains(&due_day) {
            return Err(Error::InvalidData(format!(
                "due day {} is outside 1-31",
                due_day
            )));
        }
        if amount_cents < 0 {
            return Err(Error::InvalidData("bill amount is negative".to_string()));
        }

        let bill = Bill {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            amount_cents,
            due_day,
            paid: false,
            created_at: Utc::now(),
        };

        self.put(&bill)?;
        Ok(bill)
    }

    /// Get one of a user's bills.
    pub fn get(&self, user_id: &str, bill_id: &str) -> Result<Option<Bill>, Error> {
        match self.tree.get(scoped_key(user_id, bill_id))? {
            Some(bytes) => Ok(Some(decode_record(&bytes)?)),
            None => Ok(None),
        }
    }

    /// List all of a user's bills.
    pub fn list_for_user(&self, user_id: &str) -> Result<Vec<Bill>, Error> {
        let mut bills = Vec::new();
        for result in self.tree.scan_prefix(scoped_prefix(user_id)) {
            let (_, bytes) = result?;
            bills.push(decode_record(&bytes)?);
        }
        Ok(bills)
    }

    /// Set a bill's paid flag.
    pub fn set_paid(&self, user_id: &str, bill_id: &str, paid: bool) -> Result<Bill, Error> {
        let mut bill = self.get(user_id, bill_id)?.ok_or(Error::NotFound)?;
        bill.paid = paid;
        self.put(&bill)?;
        Ok(bill)
    }

    /// Delete a bill. Returns whether anything was removed.
    pub fn delete(&self, user_id: &str, bill_id: &str) -> Result<bool, Error> {
        Ok(self.tree.remove(scoped_key(user_id, bill_id))?.is_some())
    }

    fn put(&self, bill: &Bill) -> Result<(), Error> {
        self.tree
            .insert(scoped_key(&bill.user_id, &bill.id), encode_record(bill)?)?;
        Ok(())
    }
}
