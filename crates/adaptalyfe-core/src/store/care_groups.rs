//! Care groups.
//!
//! A care group is a user-managed list of trusted people (family members,
//! support workers). Besides showing up in the app, care groups back the
//! `USER_LIST` object-access group kind: a document shared with a care
//! group is readable by every member.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{decode_record, encode_record};
use crate::acl::{AccessGroup, AclError, AclResult, GroupResolver, UserListGroup};
use crate::error::Error;

const CARE_GROUPS_TREE: &[u8] = b"care_groups";

/// A named list of trusted user ids, owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareGroup {
    /// Stable identifier, referenced by ACL rules.
    pub id: String,
    /// User who created and manages the group.
    pub owner_id: String,
    /// Display name ("My support team").
    pub name: String,
    /// Member user ids. The owner is implicitly a member.
    pub member_ids: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Store for care groups, keyed by group id.
#[derive(Clone)]
pub struct CareGroupStore {
    tree: sled::Tree,
}

impl CareGroupStore {
    pub(crate) fn open(db: &sled::Db) -> Result<Self, Error> {
        Ok(Self {
            tree: db.open_tree(CARE_GROUPS_TREE)?,
        })
    }

    /// Create a group.
    pub fn create(
        &self,
        owner_id: &str,
        name: &str,
        member_ids: Vec<String>,
    ) -> Result<CareGroup, Error> {
        let group = CareGroup {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            member_ids,
            created_at: Utc::now(),
        };

        self.put(&group)?;
        Ok(group)
    }

    /// Get a group by id.
    pub fn get(&self, group_id: &str) -> Result<Option<CareGroup>, Error> {
        match self.tree.get(group_id.as_bytes())? {
            Some(bytes) => Ok(Some(decode_record(&bytes)?)),
            None => Ok(None),
        }
    }

    /// List groups owned by a user.
    pub fn list_for_owner(&self, owner_id: &str) -> Result<Vec<CareGroup>, Error> {
        // Full scan to find by owner (not optimal, but groups are few)
        let mut groups = Vec::new();
        for result in self.tree.iter() {
            let (_, bytes) = result?;
            let group: CareGroup = decode_record(&bytes)?;
            if group.owner_id == owner_id {
                groups.push(group);
            }
        }
        Ok(groups)
    }

    /// Add a member to a group. Fails with [`Error::NotFound`] when the
    /// group does not exist; adding an existing member is a no-op.
    pub fn add_member(&self, group_id: &str, user_id: &str) -> Result<CareGroup, Error> {
        let mut group = self.get(group_id)?.ok_or(Error::NotFound)?;
        if !group.member_ids.iter().any(|m| m == user_id) {
            group.member_ids.push(user_id.to_string());
            self.put(&group)?;
        }
        Ok(group)
    }

    /// Delete a group. Returns whether anything was removed.
    pub fn delete(&self, group_id: &str) -> Result<bool, Error> {
        Ok(self.tree.remove(group_id.as_bytes())?.is_some())
    }

    fn put(&self, group: &CareGroup) -> Result<(), Error> {
        self.tree
            .insert(group.id.as_bytes(), encode_record(group)?)?;
        Ok(())
    }
}

/// Resolves `USER_LIST` ACL groups from persisted care groups.
///
/// A group id that no longer exists resolves to an empty group: a deleted
/// care group denies access, it does not break policy evaluation.
pub struct CareGroupResolver {
    store: CareGroupStore,
}

impl CareGroupResolver {
    /// Create a resolver over the given store.
    pub fn new(store: CareGroupStore) -> Self {
        Self { store }
    }
}

impl GroupResolver for CareGroupResolver {
    fn resolve(&self, group_id: &str) -> AclResult<Box<dyn AccessGroup>> {
        let group = self
            .store
            .get(group_id)
            .map_err(|e| AclError::Membership(e.to_string()))?;

        let members = match group {
            Some(group) => {
                let mut members = group.member_ids;
                members.push(group.owner_id);
                members
            }
            None => Vec::new(),
        };

        Ok(Box::new(UserListGroup::new(members)))
    }
}
