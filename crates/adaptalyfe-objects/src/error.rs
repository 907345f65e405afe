//! Vault error types.

use thiserror::Error;

/// Errors from the object vault.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The referenced object does not exist.
    #[error("object not found: {0}")]
    NotFound(String),

    /// An object path could not be parsed or falls outside the vault.
    #[error("invalid object path: {0}")]
    InvalidPath(String),

    /// Underlying object store failure.
    #[error("object store error: {0}")]
    Store(#[from] object_store::Error),

    /// Access-policy error.
    #[error(transparent)]
    Acl(#[from] adaptalyfe_core::acl::AclError),

    /// A metadata document could not be encoded or decoded.
    #[error("metadata codec error: {0}")]
    MetadataCodec(String),

    /// The URL-signing sidecar failed.
    #[error("url signing failed: {0}")]
    Signing(String),
}
