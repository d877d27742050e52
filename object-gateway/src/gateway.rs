//! The Object Gateway: path policy, existence gating, direct transfers
//! and presigned grants over an injected storage backend.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::bucket::Bucket;
use crate::error::{GatewayError, Result};
use crate::storage::{ObjectStore, StoreError};

/// Default lifetime of presigned URLs, in minutes.
pub const DEFAULT_URL_EXPIRY_MINUTES: u64 = 360;

/// A signed upload grant together with the object path it is scoped to.
///
/// The path is returned alongside the URL because the gateway may have
/// derived (or minted) it on the caller's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedUpload {
    pub url: String,
    pub path: String,
}

/// A fully buffered download: the object's bytes plus a display file name
/// taken from the trailing path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedObject {
    pub file_name: String,
    pub content: Bytes,
}

/// Mediates every interaction with the object store.
///
/// Holds one long-lived backend handle, shared read-only across concurrent
/// invocations; cloning is cheap. Every operation is a single independent
/// request/response cycle against the backend (two for check-then-act
/// operations) and may suspend on network I/O.
#[derive(Clone)]
pub struct ObjectGateway {
    store: Arc<dyn ObjectStore>,
}

impl ObjectGateway {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Derive the object path for `file_name`.
    ///
    /// Owner-scoped buckets namespace the key as `{owner}/{file_name}`
    /// when an owner identity is supplied; every other combination keeps
    /// the bare file name. `file_name` must be non-empty; that is the
    /// caller's responsibility and is not validated here.
    pub fn derive_path(bucket: Bucket, file_name: &str, owner: Option<&str>) -> String {
        match owner {
            Some(owner) if bucket.owner_scoped() => format!("{owner}/{file_name}"),
            _ => file_name.to_string(),
        }
    }

    /// Fail with [`GatewayError::NotFound`] unless (bucket, path) exists.
    ///
    /// Runs before every read, delete and presigned-read operation, as a
    /// round trip separate from the dependent call. The object can be
    /// removed by another caller between the two; the dependent call then
    /// surfaces whatever the backend reports.
    pub async fn assert_exists(&self, path: &str, bucket: Bucket) -> Result<()> {
        debug!(bucket = %bucket, path, "checking object existence");
        self.store
            .stat_object(bucket, path)
            .await
            .map(drop)
            .map_err(|err| Self::classify(err, "stat", bucket, path))
    }

    /// Remove the object at (bucket, path).
    ///
    /// The existence gate runs first, so removing an already-removed path
    /// fails fast with [`GatewayError::NotFound`] instead of silently
    /// succeeding.
    pub async fn remove_object(&self, path: &str, bucket: Bucket) -> Result<()> {
        self.assert_exists(path, bucket).await?;

        self.store
            .remove_object(bucket, path)
            .await
            .map_err(|err| Self::classify(err, "remove", bucket, path))?;

        info!(bucket = %bucket, path, "object removed");
        Ok(())
    }

    /// Store `content` under the derived path and return that path.
    ///
    /// No existence check runs first: uploads create or overwrite, last
    /// writer wins. `content` must already be fully buffered.
    pub async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        content: Bytes,
        bucket: Bucket,
        owner: Option<&str>,
    ) -> Result<String> {
        let path = Self::derive_path(bucket, file_name, owner);

        if content_type.parse::<mime::Mime>().is_err() {
            warn!(content_type, path = %path, "unparseable content type, storing as-is");
        }

        let length = content.len();
        self.store
            .put_object(bucket, &path, content, content_type)
            .await
            .map_err(|err| Self::classify(err, "upload", bucket, &path))?;

        info!(bucket = %bucket, path = %path, length, "object uploaded");
        Ok(path)
    }

    /// Fetch the object at (bucket, path), fully buffered.
    ///
    /// The display file name is the trailing path segment. The whole body
    /// is materialized in memory before returning; callers needing
    /// streaming semantics are outside this contract.
    pub async fn download(&self, path: &str, bucket: Bucket) -> Result<DownloadedObject> {
        self.assert_exists(path, bucket).await?;

        let content = self
            .store
            .get_object(bucket, path)
            .await
            .map_err(|err| Self::classify(err, "download", bucket, path))?;

        debug!(bucket = %bucket, path, length = content.len(), "object downloaded");
        Ok(DownloadedObject {
            file_name: trailing_segment(path).to_string(),
            content,
        })
    }

    /// Issue a presigned PUT grant for a client-side upload.
    ///
    /// Path derivation matches [`ObjectGateway::upload`]. When no file
    /// name is supplied, a fresh UUID is minted as the object name so the
    /// returned path is always concrete. No existence gate runs: the
    /// grant's purpose is to create objects that do not exist yet.
    pub async fn presign_upload(
        &self,
        file_name: Option<&str>,
        bucket: Bucket,
        owner: Option<&str>,
        expiry_minutes: Option<u64>,
    ) -> Result<PresignedUpload> {
        let minted;
        let file_name = match file_name {
            Some(name) => name,
            None => {
                minted = Uuid::new_v4().to_string();
                minted.as_str()
            }
        };

        let path = Self::derive_path(bucket, file_name, owner);
        let url = self
            .store
            .presigned_put(bucket, &path, expiry(expiry_minutes))
            .await
            .map_err(|err| Self::classify(err, "presign-upload", bucket, &path))?;

        debug!(bucket = %bucket, path = %path, "issued upload grant");
        Ok(PresignedUpload { url, path })
    }

    /// Issue a presigned GET grant that forces a save dialog.
    ///
    /// The signed URL makes the backend respond with
    /// `Content-Disposition: attachment`, naming `desired_file_name` when
    /// given, else the trailing path segment.
    pub async fn presign_download(
        &self,
        path: &str,
        bucket: Bucket,
        desired_file_name: Option<&str>,
        expiry_minutes: Option<u64>,
    ) -> Result<String> {
        self.assert_exists(path, bucket).await?;

        let file_name = desired_file_name.unwrap_or_else(|| trailing_segment(path));
        let disposition = format!("attachment; filename={file_name}");
        let url = self
            .store
            .presigned_get(bucket, path, expiry(expiry_minutes), Some(&disposition))
            .await
            .map_err(|err| Self::classify(err, "presign-download", bucket, path))?;

        debug!(bucket = %bucket, path, "issued download grant");
        Ok(url)
    }

    /// Issue a presigned GET grant for inline viewing.
    ///
    /// Identical to [`ObjectGateway::presign_download`] but without the
    /// disposition override, so a browser may render the object in place.
    pub async fn presign_view(
        &self,
        path: &str,
        bucket: Bucket,
        expiry_minutes: Option<u64>,
    ) -> Result<String> {
        self.assert_exists(path, bucket).await?;

        let url = self
            .store
            .presigned_get(bucket, path, expiry(expiry_minutes), None)
            .await
            .map_err(|err| Self::classify(err, "presign-view", bucket, path))?;

        debug!(bucket = %bucket, path, "issued view grant");
        Ok(url)
    }

    fn classify(err: StoreError, operation: &'static str, bucket: Bucket, path: &str) -> GatewayError {
        match err {
            StoreError::NotFound => GatewayError::NotFound {
                bucket,
                path: path.to_string(),
            },
            StoreError::Backend(source) => {
                error!(bucket = %bucket, path, operation, "storage backend call failed: {source:#}");
                GatewayError::Backend {
                    operation,
                    bucket,
                    path: path.to_string(),
                    source,
                }
            }
        }
    }
}

fn expiry(minutes: Option<u64>) -> Duration {
    Duration::from_secs(minutes.unwrap_or(DEFAULT_URL_EXPIRY_MINUTES) * 60)
}

fn trailing_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
