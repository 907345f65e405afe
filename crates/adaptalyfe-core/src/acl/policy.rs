//! Access policy types and their stored JSON shape.

use serde::{Deserialize, Serialize};

/// Metadata key under which an object's access policy is stored.
pub const ACL_POLICY_METADATA_KEY: &str = "custom:aclPolicy";

/// Visibility of a stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Readable by anyone, including anonymous callers.
    Public,
    /// Readable only through the owner or a matching ACL rule.
    Private,
}

/// Permission that can be requested on, or granted to, a stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Read access.
    Read,
    /// Write access. Implies read.
    Write,
}

impl Permission {
    /// Check whether a granted permission satisfies this requested one.
    ///
    /// `write` grants imply `read`; `read` grants never imply `write`;
    /// exact match always satisfies.
    pub fn satisfied_by(self, granted: Permission) -> bool {
        match self {
            Permission::Read => matches!(granted, Permission::Read | Permission::Write),
            Permission::Write => granted == Permission::Write,
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Permission::Read => write!(f, "read"),
            Permission::Write => write!(f, "write"),
        }
    }
}

/// Reference to a group of users, resolved through a
/// [`GroupRegistry`](super::GroupRegistry) at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclGroup {
    /// Group kind tag (e.g. `USER_LIST`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Group identifier, interpreted by the kind's resolver.
    pub id: String,
}

impl AclGroup {
    /// Create a group reference.
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// A single grant: members of `group` get `permission`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclRule {
    /// The group being granted access.
    pub group: AclGroup,
    /// The permission granted to the group's members.
    pub permission: Permission,
}

/// The complete access-control record attached to one stored object.
///
/// Serialized as `{"owner": ..., "visibility": ..., "aclRules": [...]}` and
/// stored verbatim under [`ACL_POLICY_METADATA_KEY`]. There is no version
/// field; readers tolerate unknown fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AclPolicy {
    /// Principal that created the object. Set once, never changes.
    pub owner: String,
    /// Public/private visibility flag.
    pub visibility: Visibility,
    /// Ordered grant list; first satisfying rule wins.
    #[serde(default)]
    pub acl_rules: Vec<AclRule>,
}

impl AclPolicy {
    /// Create a policy with no group grants.
    pub fn new(owner: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            owner: owner.into(),
            visibility,
            acl_rules: Vec::new(),
        }
    }

    /// Append a group grant.
    pub fn with_rule(mut self, group: AclGroup, permission: Permission) -> Self {
        self.acl_rules.push(AclRule { group, permission });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_satisfaction_truth_table() {
        assert!(Permission::Read.satisfied_by(Permission::Read));
        assert!(Permission::Read.satisfied_by(Permission::Write));
        assert!(!Permission::Write.satisfied_by(Permission::Read));
        assert!(Permission::Write.satisfied_by(Permission::Write));
    }

    #[test]
    fn test_policy_wire_shape() {
        let policy = AclPolicy::new("u1", Visibility::Private).with_rule(
            AclGroup::new("USER_LIST", "g1"),
            Permission::Read,
        );

        let json = serde_json::to_value(&policy).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "owner": "u1",
                "visibility": "private",
                "aclRules": [
                    {"group": {"type": "USER_LIST", "id": "g1"}, "permission": "read"}
                ]
            })
        );
    }

    #[test]
    fn test_policy_decode() {
        let raw = r#"{
            "owner": "u1",
            "visibility": "public",
            "aclRules": [
                {"group": {"type": "SUBSCRIBER", "id": "premium"}, "permission": "write"}
            ]
        }"#;

        let policy: AclPolicy = serde_json::from_str(raw).unwrap();
        assert_eq!(policy.owner, "u1");
        assert_eq!(policy.visibility, Visibility::Public);
        assert_eq!(policy.acl_rules.len(), 1);
        assert_eq!(policy.acl_rules[0].group.kind, "SUBSCRIBER");
        assert_eq!(policy.acl_rules[0].permission, Permission::Write);
    }

    #[test]
    fn test_policy_decode_without_rules() {
        // Policies written before any grant was added omit the list.
        let policy: AclPolicy =
            serde_json::from_str(r#"{"owner": "u1", "visibility": "private"}"#).unwrap();
        assert!(policy.acl_rules.is_empty());
    }
}
