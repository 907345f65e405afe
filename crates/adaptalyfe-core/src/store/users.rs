//! User accounts and credentials.
//!
//! Passwords are stored as a salted blake3 hash; the salt is per-user and
//! hex-encoded next to the hash.

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::{decode_record, encode_record};
use crate::error::Error;

const USERS_TREE: &[u8] = b"users";
const USERNAME_INDEX_TREE: &[u8] = b"users:by_name";

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The supported individual using the app day to day.
    Individual,
    /// A caregiver supporting one or more individuals.
    Caregiver,
}

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Stable identifier.
    pub id: String,
    /// Unique login name.
    pub username: String,
    /// Name shown in the UI.
    pub display_name: String,
    /// Account role.
    pub role: Role,
    /// Salted blake3 hash of the password.
    pub password_hash: String,
    /// Hex-encoded per-user salt.
    pub salt: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Check a candidate password against the stored hash.
    pub fn password_matches(&self, password: &str) -> bool {
        hash_password(password, &self.salt) == self.password_hash
    }
}

/// Store for user accounts with a username uniqueness index.
#[derive(Clone)]
pub struct UserStore {
    tree: sled::Tree,
    by_name: sled::Tree,
}

impl UserStore {
    pub(crate) fn open(db: &sled::Db) -> Result<Self, Error> {
        Ok(Self {
            tree: db.open_tree(USERS_TREE)?,
            by_name: db.open_tree(USERNAME_INDEX_TREE)?,
        })
    }

    /// Create an account. Fails with [`Error::Conflict`] when the username
    /// is already taken.
    pub fn create(
        &self,
        username: &str,
        password: &str,
        display_name: &str,
        role: Role,
    ) -> Result<User, Error> {
        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt = hex::encode(salt);

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            display_name: display_name.to_string(),
            role,
            password_hash: hash_password(password, &salt),
            salt,
            created_at: Utc::now(),
        };

        // Claim the username atomically before writing the record.
        let claimed = self.by_name.compare_and_swap(
            username.as_bytes(),
            None as Option<&[u8]>,
            Some(user.id.as_bytes()),
        )?;
        if claimed.is_err() {
            return Err(Error::Conflict(format!("username {} is taken", username)));
        }

        self.tree
            .insert(user.id.as_bytes(), encode_record(&user)?)?;

        debug!(username, "user account created");
        Ok(user)
    }

    /// Get a user by id.
    pub fn get(&self, id: &str) -> Result<Option<User>, Error> {
        match self.tree.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(decode_record(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Get a user by login name.
    pub fn get_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        match self.by_name.get(username.as_bytes())? {
            Some(id) => {
                let id = String::from_utf8_lossy(&id).to_string();
                self.get(&id)
            }
            None => Ok(None),
        }
    }

    /// Check credentials; returns the user only when the password matches.
    pub fn verify_password(&self, username: &str, password: &str) -> Result<Option<User>, Error> {
        match self.get_by_username(username)? {
            Some(user) if user.password_matches(password) => Ok(Some(user)),
            _ => Ok(None),
        }
    }
}

fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize().to_hex().to_string()
}
