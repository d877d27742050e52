//! Storage backend capability and its implementations.
//!
//! The gateway talks to the object store through the [`ObjectStore`]
//! trait so it can be exercised against [`memory::MemoryStore`] without a
//! live backend; [`s3::S3Store`] is the production implementation.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bucket::Bucket;

pub mod memory;
pub mod s3;

/// Failure at the storage seam.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend's no-such-key class of responses.
    #[error("no such key")]
    NotFound,

    /// Everything else, original cause preserved.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Object metadata as reported by the backend's stat operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStat {
    pub size: u64,
    pub content_type: Option<String>,
    pub etag: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Capability the gateway requires from a storage backend.
///
/// One round trip per call; no retries at this layer. The handle is shared
/// read-only across concurrent invocations, so implementors must be
/// `Send + Sync`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch object metadata; [`StoreError::NotFound`] when the key is
    /// absent.
    async fn stat_object(&self, bucket: Bucket, key: &str) -> Result<ObjectStat, StoreError>;

    /// Create or overwrite the object at `key`, tagged with
    /// `content_type` and the explicit content length.
    async fn put_object(
        &self,
        bucket: Bucket,
        key: &str,
        content: Bytes,
        content_type: &str,
    ) -> Result<(), StoreError>;

    /// Read the full object body into memory.
    async fn get_object(&self, bucket: Bucket, key: &str) -> Result<Bytes, StoreError>;

    /// Remove the object at `key`. Removing an absent key is not an error
    /// at this layer; the gateway's existence gate supplies fail-fast
    /// semantics.
    async fn remove_object(&self, bucket: Bucket, key: &str) -> Result<(), StoreError>;

    /// Signed GET URL valid for `expires_in`. When given,
    /// `response_disposition` is echoed back by the backend as the
    /// `Content-Disposition` response header.
    async fn presigned_get(
        &self,
        bucket: Bucket,
        key: &str,
        expires_in: Duration,
        response_disposition: Option<&str>,
    ) -> Result<String, StoreError>;

    /// Signed PUT URL valid for `expires_in`. Never checks existence:
    /// the target usually does not exist yet.
    async fn presigned_put(
        &self,
        bucket: Bucket,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StoreError>;
}
