//! Access decision function.

use super::error::AclResult;
use super::group::GroupRegistry;
use super::policy::{AclPolicy, Permission, Visibility};

/// Decide whether `requester` may perform `requested` on an object guarded
/// by `policy`.
///
/// The decision is fail-closed: a missing policy denies everything, and an
/// anonymous requester is denied everything except reads of public objects.
/// The recorded owner is always allowed. Otherwise the rule list is walked
/// in order and the first rule whose group contains the requester and whose
/// grant satisfies the requested permission allows.
///
/// A rule referencing an unregistered group kind aborts the whole check
/// with [`AclError::UnknownGroupType`](super::AclError::UnknownGroupType),
/// even when a later rule would have matched. A policy that names a group
/// kind nobody can resolve is misconfigured, and skipping the rule would
/// silently change what the policy grants.
pub fn can_access(
    policy: Option<&AclPolicy>,
    requester: Option<&str>,
    requested: Permission,
    registry: &GroupRegistry,
) -> AclResult<bool> {
    let Some(policy) = policy else {
        return Ok(false);
    };

    // Public read bypasses identity entirely.
    if policy.visibility == Visibility::Public && requested == Permission::Read {
        return Ok(true);
    }

    let Some(requester) = requester else {
        return Ok(false);
    };

    if requester == policy.owner {
        return Ok(true);
    }

    for rule in &policy.acl_rules {
        let group = registry.resolve(&rule.group)?;
        if group.has_member(requester)? && requested.satisfied_by(rule.permission) {
            return Ok(true);
        }
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use crate::acl::error::AclError;
    use crate::acl::group::{AccessGroup, GroupResolver, UserListGroup, USER_LIST_GROUP};
    use crate::acl::policy::{AclGroup, AclPolicy};

    struct MapResolver(HashMap<String, Vec<String>>);

    impl GroupResolver for MapResolver {
        fn resolve(&self, group_id: &str) -> AclResult<Box<dyn AccessGroup>> {
            let members = self.0.get(group_id).cloned().unwrap_or_default();
            Ok(Box::new(UserListGroup::new(members)))
        }
    }

    fn registry_with(groups: &[(&str, &[&str])]) -> GroupRegistry {
        let map: HashMap<String, Vec<String>> = groups
            .iter()
            .map(|(id, members)| {
                (
                    id.to_string(),
                    members.iter().map(|m| m.to_string()).collect(),
                )
            })
            .collect();

        let mut registry = GroupRegistry::new();
        registry.register(USER_LIST_GROUP, Arc::new(MapResolver(map)));
        registry
    }

    fn shared_read_policy() -> AclPolicy {
        AclPolicy::new("u1", Visibility::Private).with_rule(
            AclGroup::new(USER_LIST_GROUP, "g1"),
            Permission::Read,
        )
    }

    #[test]
    fn test_missing_policy_denies_everything() {
        let registry = registry_with(&[]);
        assert!(!can_access(None, Some("u1"), Permission::Read, &registry).unwrap());
        assert!(!can_access(None, Some("u1"), Permission::Write, &registry).unwrap());
        assert!(!can_access(None, None, Permission::Read, &registry).unwrap());
    }

    #[test]
    fn test_public_read_allows_anyone() {
        let registry = registry_with(&[]);
        let policy = AclPolicy::new("u1", Visibility::Public);

        assert!(can_access(Some(&policy), None, Permission::Read, &registry).unwrap());
        assert!(can_access(Some(&policy), Some("stranger"), Permission::Read, &registry).unwrap());

        // Public does not extend to writes.
        assert!(!can_access(Some(&policy), None, Permission::Write, &registry).unwrap());
        assert!(!can_access(Some(&policy), Some("stranger"), Permission::Write, &registry).unwrap());
    }

    #[test]
    fn test_private_denies_anonymous() {
        let registry = registry_with(&[("g1", &["u2"])]);
        let policy = shared_read_policy();

        assert!(!can_access(Some(&policy), None, Permission::Read, &registry).unwrap());
        assert!(!can_access(Some(&policy), None, Permission::Write, &registry).unwrap());
    }

    #[test]
    fn test_owner_always_allowed() {
        let registry = registry_with(&[]);
        let policy = AclPolicy::new("u1", Visibility::Private);

        assert!(can_access(Some(&policy), Some("u1"), Permission::Read, &registry).unwrap());
        assert!(can_access(Some(&policy), Some("u1"), Permission::Write, &registry).unwrap());
    }

    #[test]
    fn test_owner_write_allowed_regardless_of_rules() {
        // The rule list only grants read, but the owner shortcut runs first.
        let registry = registry_with(&[("g1", &["u2"])]);
        let policy = shared_read_policy();

        assert!(can_access(Some(&policy), Some("u1"), Permission::Write, &registry).unwrap());
    }

    #[test]
    fn test_member_read_allowed() {
        let registry = registry_with(&[("g1", &["u2"])]);
        let policy = shared_read_policy();

        assert!(can_access(Some(&policy), Some("u2"), Permission::Read, &registry).unwrap());
    }

    #[test]
    fn test_read_grant_does_not_satisfy_write() {
        let registry = registry_with(&[("g1", &["u2"])]);
        let policy = shared_read_policy();

        assert!(!can_access(Some(&policy), Some("u2"), Permission::Write, &registry).unwrap());
    }

    #[test]
    fn test_write_grant_satisfies_read() {
        let registry = registry_with(&[("g1", &["u2"])]);
        let policy = AclPolicy::new("u1", Visibility::Private).with_rule(
            AclGroup::new(USER_LIST_GROUP, "g1"),
            Permission::Write,
        );

        assert!(can_access(Some(&policy), Some("u2"), Permission::Read, &registry).unwrap());
        assert!(can_access(Some(&policy), Some("u2"), Permission::Write, &registry).unwrap());
    }

    #[test]
    fn test_later_rule_still_allows() {
        // A non-satisfying rule ahead of a satisfying one must not cause a
        // false negative.
        let registry = registry_with(&[("g1", &["u3"]), ("g2", &["u2"])]);
        let policy = AclPolicy::new("u1", Visibility::Private)
            .with_rule(AclGroup::new(USER_LIST_GROUP, "g1"), Permission::Write)
            .with_rule(AclGroup::new(USER_LIST_GROUP, "g2"), Permission::Read);

        assert!(can_access(Some(&policy), Some("u2"), Permission::Read, &registry).unwrap());
    }

    #[test]
    fn test_non_member_denied() {
        let registry = registry_with(&[("g1", &["u2"])]);
        let policy = shared_read_policy();

        assert!(!can_access(Some(&policy), Some("u3"), Permission::Read, &registry).unwrap());
    }

    #[test]
    fn test_unknown_group_kind_is_fatal() {
        let registry = registry_with(&[("g2", &["u3"])]);
        let policy = AclPolicy::new("u1", Visibility::Private).with_rule(
            AclGroup::new("UNKNOWN_KIND", "g2"),
            Permission::Read,
        );

        let result = can_access(Some(&policy), Some("u3"), Permission::Read, &registry);
        match result {
            Err(AclError::UnknownGroupType(kind)) => assert_eq!(kind, "UNKNOWN_KIND"),
            other => panic!("expected UnknownGroupType, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_unknown_group_kind_aborts_before_later_rules() {
        // Even a rule that would have allowed the requester does not run
        // once an earlier rule fails to resolve.
        let registry = registry_with(&[("g2", &["u2"])]);
        let policy = AclPolicy::new("u1", Visibility::Private)
            .with_rule(AclGroup::new("UNKNOWN_KIND", "g1"), Permission::Read)
            .with_rule(AclGroup::new(USER_LIST_GROUP, "g2"), Permission::Read);

        assert!(can_access(Some(&policy), Some("u2"), Permission::Read, &registry).is_err());
    }

    #[test]
    fn test_owner_bypasses_unknown_group_kind() {
        let registry = registry_with(&[]);
        let policy = AclPolicy::new("u1", Visibility::Private).with_rule(
            AclGroup::new("UNKNOWN_KIND", "g1"),
            Permission::Read,
        );

        // The owner shortcut runs before any rule is resolved.
        assert!(can_access(Some(&policy), Some("u1"), Permission::Write, &registry).unwrap());
    }
}
