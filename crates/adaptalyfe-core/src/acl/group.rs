//! Group membership resolution.
//!
//! ACL rules reference groups by an open-ended kind tag. Each kind is backed
//! by a [`GroupResolver`] registered in a [`GroupRegistry`]; resolving a tag
//! with no registered resolver is an error, never a silent non-match.

use std::collections::HashMap;
use std::sync::Arc;

use super::error::{AclError, AclResult};
use super::policy::AclGroup;

/// Kind tag for groups backed by an explicit member list.
pub const USER_LIST_GROUP: &str = "USER_LIST";

/// A concrete group of users that can answer membership queries.
pub trait AccessGroup: Send + Sync {
    /// Check whether the given user is a member of this group.
    fn has_member(&self, user_id: &str) -> AclResult<bool>;
}

/// Resolves group ids of one particular kind into [`AccessGroup`]s.
pub trait GroupResolver: Send + Sync {
    /// Resolve a group id into a concrete group.
    ///
    /// An id that does not name an existing group should resolve to an
    /// empty group, not an error: a deleted group denies, it does not
    /// break evaluation.
    fn resolve(&self, group_id: &str) -> AclResult<Box<dyn AccessGroup>>;
}

/// Registry mapping group kind tags to resolvers.
#[derive(Clone, Default)]
pub struct GroupRegistry {
    resolvers: HashMap<String, Arc<dyn GroupResolver>>,
}

impl GroupRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resolver for a group kind tag.
    pub fn register(&mut self, kind: impl Into<String>, resolver: Arc<dyn GroupResolver>) {
        self.resolvers.insert(kind.into(), resolver);
    }

    /// Check whether a kind tag has a registered resolver.
    pub fn has_kind(&self, kind: &str) -> bool {
        self.resolvers.contains_key(kind)
    }

    /// Resolve a group reference into a concrete group.
    ///
    /// Returns [`AclError::UnknownGroupType`] when the reference's kind tag
    /// has no registered resolver.
    pub fn resolve(&self, group: &AclGroup) -> AclResult<Box<dyn AccessGroup>> {
        match self.resolvers.get(&group.kind) {
            Some(resolver) => resolver.resolve(&group.id),
            None => Err(AclError::UnknownGroupType(group.kind.clone())),
        }
    }
}

/// Group with a fixed member list.
///
/// This is the resolved form of `USER_LIST` groups; production resolvers
/// build it from persisted care groups.
pub struct UserListGroup {
    members: Vec<String>,
}

impl UserListGroup {
    /// Create a group from its member ids.
    pub fn new(members: Vec<String>) -> Self {
        Self { members }
    }
}

impl AccessGroup for UserListGroup {
    fn has_member(&self, user_id: &str) -> AclResult<bool> {
        Ok(self.members.iter().any(|member| member == user_id))
    }
}
