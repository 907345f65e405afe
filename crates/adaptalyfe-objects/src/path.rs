//! Object path parsing and namespace handling.
//!
//! Objects are addressed by `/bucket/name` strings. Private entity objects
//! live under one configured directory and are exposed to clients as
//! `/objects/<id>` paths; public assets are looked up across an ordered
//! list of search paths.

use std::fmt;

use crate::error::VaultError;

/// Client-facing prefix for private entity objects.
pub const ENTITY_PATH_PREFIX: &str = "/objects/";

/// A `/bucket/name` object reference split into parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    /// Bucket component.
    pub bucket: String,
    /// Object name within the bucket. May contain slashes.
    pub name: String,
}

impl ParsedPath {
    /// Parse a `/bucket/name` string.
    pub fn parse(raw: &str) -> Result<Self, VaultError> {
        let trimmed = raw.strip_prefix('/').unwrap_or(raw);
        let (bucket, name) = trimmed
            .split_once('/')
            .ok_or_else(|| VaultError::InvalidPath(raw.to_string()))?;

        if bucket.is_empty() || name.is_empty() {
            return Err(VaultError::InvalidPath(raw.to_string()));
        }

        Ok(Self {
            bucket: bucket.to_string(),
            name: name.to_string(),
        })
    }

    /// Key of the object's content under the store root.
    pub fn key(&self) -> String {
        format!("{}/{}", self.bucket, self.name)
    }

    /// Key of the object's metadata document.
    pub fn meta_key(&self) -> String {
        format!("{}/{}.meta", self.bucket, self.name)
    }
}

impl fmt::Display for ParsedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.bucket, self.name)
    }
}

/// Object namespace configuration.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Directory (`/bucket/prefix`) holding private entity objects.
    pub private_dir: String,
    /// Ordered search paths (`/bucket/prefix`) for public assets.
    pub public_search_paths: Vec<String>,
}

impl VaultConfig {
    /// Create a configuration with the given private directory and no
    /// public search paths.
    pub fn new(private_dir: impl Into<String>) -> Self {
        Self {
            private_dir: normalize_dir(&private_dir.into()),
            public_search_paths: Vec::new(),
        }
    }

    /// Set the public search paths.
    pub fn with_public_search_paths(mut self, paths: Vec<String>) -> Self {
        self.public_search_paths = paths.iter().map(|p| normalize_dir(p)).collect();
        self
    }

    /// Normalize a raw signed URL or `/bucket/name` string into the
    /// client-facing `/objects/...` form.
    ///
    /// Returns `None` when the path falls outside the private directory.
    pub fn entity_path(&self, raw: &str) -> Option<String> {
        let path = strip_url(raw);
        let rest = path.strip_prefix(&self.private_dir)?.strip_prefix('/')?;
        if !is_clean_relative(rest) {
            return None;
        }
        Some(format!("{}{}", ENTITY_PATH_PREFIX, rest))
    }

    /// Resolve a client-facing `/objects/...` path back into the private
    /// directory.
    pub fn resolve_entity_path(&self, entity_path: &str) -> Result<ParsedPath, VaultError> {
        let rest = entity_path
            .strip_prefix(ENTITY_PATH_PREFIX)
            .ok_or_else(|| VaultError::InvalidPath(entity_path.to_string()))?;

        if !is_clean_relative(rest) {
            return Err(VaultError::InvalidPath(entity_path.to_string()));
        }

        ParsedPath::parse(&format!("{}/{}", self.private_dir, rest))
    }

    /// Candidate full paths for a public asset, in search order.
    pub fn public_candidates(&self, rel: &str) -> Result<Vec<ParsedPath>, VaultError> {
        if !is_clean_relative(rel) {
            return Err(VaultError::InvalidPath(rel.to_string()));
        }

        self.public_search_paths
            .iter()
            .map(|dir| ParsedPath::parse(&format!("{}/{}", dir, rel)))
            .collect()
    }
}

/// Strip scheme, host, and query from a URL, leaving the path.
fn strip_url(raw: &str) -> &str {
    let without_query = raw.split('?').next().unwrap_or(raw);
    match without_query.split_once("://") {
        Some((_, rest)) => match rest.split_once('/') {
            Some((_, path)) => &without_query[without_query.len() - path.len() - 1..],
            None => "/",
        },
        None => without_query,
    }
}

/// A relative path with no empty, `.`, or `..` segments.
fn is_clean_relative(rel: &str) -> bool {
    !rel.is_empty()
        && rel
            .split('/')
            .all(|seg| !seg.is_empty() && seg != "." && seg != "..")
}

/// Leading slash, no trailing slash.
fn normalize_dir(dir: &str) -> String {
    let trimmed = dir.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
