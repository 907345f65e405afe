//! ACL-specific error types.

use thiserror::Error;

/// Errors raised while decoding or evaluating access policies.
#[derive(Debug, Error)]
pub enum AclError {
    /// A rule references a group kind with no registered resolver.
    #[error("unknown object access group type: {0}")]
    UnknownGroupType(String),

    /// Group membership could not be determined.
    #[error("group membership lookup failed: {0}")]
    Membership(String),

    /// A stored policy value could not be decoded.
    #[error("malformed access policy: {0}")]
    MalformedPolicy(String),
}

/// Result type for ACL operations.
pub type AclResult<T> = Result<T, AclError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AclError::UnknownGroupType("EMAIL_DOMAIN".to_string());
        assert!(err.to_string().contains("EMAIL_DOMAIN"));

        let err = AclError::MalformedPolicy("expected value".to_string());
        assert!(err.to_string().contains("malformed access policy"));
    }
}
