//! AdaptaLyfe object vault.
//!
//! User documents (care plans, medical records, photos) live in a cloud
//! object store behind per-object access policies. This crate provides the
//! vault service: content and metadata storage over an injected
//! [`object_store::ObjectStore`], public/private namespace handling,
//! time-limited URL signing through the storage sidecar, and the policy
//! surface (`get_policy` / `set_policy` / `can_access`) consumed by the
//! HTTP layer before streaming a file back to a browser.

pub mod error;
pub mod path;
pub mod signer;
pub mod vault;

pub use error::VaultError;
pub use path::{ParsedPath, VaultConfig};
pub use signer::{SidecarSigner, SignedUrlMethod, StaticSigner, UrlSigner};
pub use vault::{Download, ObjectVault, UploadTicket, CONTENT_TYPE_METADATA_KEY, DEFAULT_URL_TTL};
