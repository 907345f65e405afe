//! Object access control.
//!
//! Every stored object carries an [`AclPolicy`]: the owner, a public/private
//! visibility flag, and an ordered list of group grants. The policy travels
//! as a JSON value under a single metadata key on the object
//! ([`ACL_POLICY_METADATA_KEY`]) and is evaluated by [`can_access`].
//!
//! # Access Model
//!
//! The decision is fail-closed:
//! - no policy on the object denies everything;
//! - public objects are readable by anyone, including anonymous callers;
//! - anonymous callers get nothing else;
//! - the owner is always allowed;
//! - otherwise the rule list is walked in order and the first rule whose
//!   group contains the requester and whose grant satisfies the requested
//!   permission allows.
//!
//! Group kinds are an open-ended tag set resolved through a
//! [`GroupRegistry`]. A rule referencing a tag with no registered resolver
//! aborts the whole check with [`AclError::UnknownGroupType`] instead of
//! being skipped.

pub mod error;
pub mod evaluator;
pub mod group;
pub mod policy;

// Error types
pub use error::{AclError, AclResult};

// Policy types
pub use policy::{AclGroup, AclPolicy, AclRule, Permission, Visibility, ACL_POLICY_METADATA_KEY};

// Group resolution
pub use group::{AccessGroup, GroupRegistry, GroupResolver, UserListGroup, USER_LIST_GROUP};

// Decision function
pub use evaluator::can_access;
