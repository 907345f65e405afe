//! Time-limited URL signing.
//!
//! Browsers upload and download objects directly against signed URLs. The
//! production signer delegates to the storage sidecar's HTTP endpoint; the
//! static signer backs tests and demo deployments where no sidecar runs.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::VaultError;
use crate::path::ParsedPath;

/// HTTP method a signed URL grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignedUrlMethod {
    Get,
    Put,
    Delete,
    Head,
}

/// Signs object URLs for direct browser access.
#[async_trait]
pub trait UrlSigner: Send + Sync {
    /// Produce a URL for `method` on `path`, valid for `ttl`.
    async fn sign(
        &self,
        path: &ParsedPath,
        method: SignedUrlMethod,
        ttl: Duration,
    ) -> Result<String, VaultError>;
}

#[derive(Debug, Serialize)]
struct SignRequest<'a> {
    bucket_name: &'a str,
    object_name: &'a str,
    method: SignedUrlMethod,
    expires_at: String,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    signed_url: String,
}

/// Signer that POSTs to the storage sidecar's signing endpoint.
pub struct SidecarSigner {
    endpoint: String,
    client: reqwest::Client,
}

impl SidecarSigner {
    /// Create a signer for the given sidecar endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl UrlSigner for SidecarSigner {
    async fn sign(
        &self,
        path: &ParsedPath,
        method: SignedUrlMethod,
        ttl: Duration,
    ) -> Result<String, VaultError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| VaultError::Signing(format!("ttl out of range: {}", e)))?;
        let expires_at = (Utc::now() + ttl).to_rfc3339();

        let request = SignRequest {
            bucket_name: &path.bucket,
            object_name: &path.name,
            method,
            expires_at,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| VaultError::Signing(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VaultError::Signing(format!(
                "sidecar returned {}",
                response.status()
            )));
        }

        let body: SignResponse = response
            .json()
            .await
            .map_err(|e| VaultError::Signing(e.to_string()))?;

        Ok(body.signed_url)
    }
}

/// Signer that fabricates unsigned URLs under a fixed base.
///
/// For tests and demo deployments only; the URLs carry no signature and
/// grant nothing by themselves.
pub struct StaticSigner {
    base: String,
}

impl StaticSigner {
    /// Create a static signer with the given URL base.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
        }
    }
}

#[async_trait]
impl UrlSigner for StaticSigner {
    async fn sign(
        &self,
        path: &ParsedPath,
        _method: SignedUrlMethod,
        _ttl: Duration,
    ) -> Result<String, VaultError> {
        Ok(format!(
            "{}/{}/{}",
            self.base.trim_end_matches('/'),
            path.bucket,
            path.name
        ))
    }
}
