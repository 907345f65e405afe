//! Object vault service.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::BoxStream;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};
use tracing::debug;
use uuid::Uuid;

use adaptalyfe_core::acl::{
    can_access, AclError, AclPolicy, GroupRegistry, Permission, Visibility,
    ACL_POLICY_METADATA_KEY,
};

use crate::error::VaultError;
use crate::path::{ParsedPath, VaultConfig, ENTITY_PATH_PREFIX};
use crate::signer::{SignedUrlMethod, UrlSigner};

/// Metadata key recording an object's content type.
pub const CONTENT_TYPE_METADATA_KEY: &str = "content-type";

/// How long signed upload/download links stay valid.
pub const DEFAULT_URL_TTL: Duration = Duration::from_secs(900);

/// Cache lifetime advertised on downloads, in seconds.
const DOWNLOAD_CACHE_TTL_SECS: u64 = 3600;

/// A streamed object download plus its response metadata.
pub struct Download {
    /// Content type from the object's metadata, or a binary default.
    pub content_type: String,
    /// Content length in bytes.
    pub content_length: u64,
    /// Cache-control value computed from the policy's visibility.
    pub cache_control: String,
    /// The object's content.
    pub stream: BoxStream<'static, Result<Bytes, object_store::Error>>,
}

/// A freshly allocated upload destination.
#[derive(Debug)]
pub struct UploadTicket {
    /// Signed URL the client PUTs the file to.
    pub upload_url: String,
    /// Full path of the allocated object.
    pub object_path: ParsedPath,
    /// Client-facing `/objects/...` path of the allocated object.
    pub entity_path: String,
}

/// Object storage service: content, metadata, policies, signed URLs.
///
/// Each object `k` has its content at `k` and a string-to-string metadata
/// document at `k.meta`; the access policy is one JSON value inside that
/// document, under [`ACL_POLICY_METADATA_KEY`]. Policy writes are
/// full-replace, last-writer-wins.
#[derive(Clone)]
pub struct ObjectVault {
    store: Arc<dyn ObjectStore>,
    signer: Arc<dyn UrlSigner>,
    config: VaultConfig,
}

impl ObjectVault {
    /// Create a vault over the given backend and signer.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        signer: Arc<dyn UrlSigner>,
        config: VaultConfig,
    ) -> Self {
        Self {
            store,
            signer,
            config,
        }
    }

    /// Namespace configuration.
    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Whether the object's content exists.
    pub async fn exists(&self, path: &ParsedPath) -> Result<bool, VaultError> {
        match self.store.head(&StorePath::from(path.key())).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Store content at the given path (server-side writes and tests;
    /// browsers upload through signed URLs).
    pub async fn put(&self, path: &ParsedPath, data: Bytes) -> Result<(), VaultError> {
        self.store
            .put(&StorePath::from(path.key()), PutPayload::from(data))
            .await?;
        Ok(())
    }

    /// Read the access policy attached to an object, if any.
    ///
    /// A missing object, metadata document, or policy key is `None`; only a
    /// policy that exists but does not decode is an error.
    pub async fn get_policy(&self, path: &ParsedPath) -> Result<Option<AclPolicy>, VaultError> {
        let metadata = self.read_metadata(path).await?;
        policy_from_metadata(&metadata)
    }

    /// Attach or replace an object's access policy.
    ///
    /// Fails with [`VaultError::NotFound`] when the object's content does
    /// not exist. Full replace; last writer wins.
    pub async fn set_policy(&self, path: &ParsedPath, policy: &AclPolicy) -> Result<(), VaultError> {
        if !self.exists(path).await? {
            return Err(VaultError::NotFound(path.to_string()));
        }

        let raw = serde_json::to_string(policy)
            .map_err(|e| VaultError::MetadataCodec(e.to_string()))?;

        let mut metadata = self.read_metadata(path).await?;
        metadata.insert(ACL_POLICY_METADATA_KEY.to_string(), raw);
        self.write_metadata(path, &metadata).await?;

        debug!(object = %path, owner = %policy.owner, "access policy replaced");
        Ok(())
    }

    /// Record an object's content type.
    pub async fn set_content_type(
        &self,
        path: &ParsedPath,
        content_type: &str,
    ) -> Result<(), VaultError> {
        let mut metadata = self.read_metadata(path).await?;
        metadata.insert(
            CONTENT_TYPE_METADATA_KEY.to_string(),
            content_type.to_string(),
        );
        self.write_metadata(path, &metadata).await
    }

    /// Policy check for a request against this object.
    pub async fn can_access(
        &self,
        path: &ParsedPath,
        requester: Option<&str>,
        requested: Permission,
        registry: &GroupRegistry,
    ) -> Result<bool, VaultError> {
        let policy = self.get_policy(path).await?;
        Ok(can_access(policy.as_ref(), requester, requested, registry)?)
    }

    /// Stream an object's content with response metadata.
    pub async fn download(&self, path: &ParsedPath) -> Result<Download, VaultError> {
        let metadata = self.read_metadata(path).await?;
        let visibility = policy_from_metadata(&metadata)?
            .map(|policy| policy.visibility)
            .unwrap_or(Visibility::Private);

        let result = match self.store.get(&StorePath::from(path.key())).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => {
                return Err(VaultError::NotFound(path.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let content_type = metadata
            .get(CONTENT_TYPE_METADATA_KEY)
            .cloned()
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let cache_scope = match visibility {
            Visibility::Public => "public",
            Visibility::Private => "private",
        };

        Ok(Download {
            content_type,
            content_length: result.meta.size as u64,
            cache_control: format!("{}, max-age={}", cache_scope, DOWNLOAD_CACHE_TTL_SECS),
            stream: result.into_stream(),
        })
    }

    /// Allocate a fresh private upload destination and sign a PUT URL.
    pub async fn create_upload(&self) -> Result<UploadTicket, VaultError> {
        let id = Uuid::new_v4();
        let object_path =
            ParsedPath::parse(&format!("{}/uploads/{}", self.config.private_dir, id))?;

        let upload_url = self
            .signer
            .sign(&object_path, SignedUrlMethod::Put, DEFAULT_URL_TTL)
            .await?;

        Ok(UploadTicket {
            upload_url,
            entity_path: format!("{}uploads/{}", ENTITY_PATH_PREFIX, id),
            object_path,
        })
    }

    /// Find a public asset across the configured search paths.
    pub async fn find_public(&self, rel: &str) -> Result<Option<ParsedPath>, VaultError> {
        for candidate in self.config.public_candidates(rel)? {
            if self.exists(&candidate).await? {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    async fn read_metadata(
        &self,
        path: &ParsedPath,
    ) -> Result<HashMap<String, String>, VaultError> {
        match self.store.get(&StorePath::from(path.meta_key())).await {
            Ok(result) => {
                let bytes = result.bytes().await?;
                serde_json::from_slice(&bytes)
                    .map_err(|e| VaultError::MetadataCodec(e.to_string()))
            }
            Err(object_store::Error::NotFound { .. }) => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_metadata(
        &self,
        path: &ParsedPath,
        metadata: &HashMap<String, String>,
    ) -> Result<(), VaultError> {
        let bytes =
            serde_json::to_vec(metadata).map_err(|e| VaultError::MetadataCodec(e.to_string()))?;
        self.store
            .put(&StorePath::from(path.meta_key()), PutPayload::from(bytes))
            .await?;
        Ok(())
    }
}

fn policy_from_metadata(
    metadata: &HashMap<String, String>,
) -> Result<Option<AclPolicy>, VaultError> {
    match metadata.get(ACL_POLICY_METADATA_KEY) {
        Some(raw) => serde_json::from_str(raw)
            .map(Some)
            .map_err(|e| AclError::MalformedPolicy(e.to_string()).into()),
        None => Ok(None),
    }
}
