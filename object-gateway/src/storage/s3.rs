//! `aws-sdk-s3` backed implementation of [`ObjectStore`].
//!
//! Works against AWS S3 or compatible services (MinIO, DigitalOcean
//! Spaces). Credentials, endpoint and addressing style come from
//! [`StorageConfig`]; the SDK client carries its own timeout and
//! connection handling, this layer adds none.

use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use chrono::DateTime;
use tracing::{debug, info};

use crate::bucket::Bucket;
use crate::config::StorageConfig;

use super::{ObjectStat, ObjectStore, StoreError};

/// S3-compatible storage backend.
///
/// Holds two SDK clients over one configuration: `client` for data-plane
/// traffic (wired to the internal endpoint when one is configured) and
/// `presign_client` for URL signing, always wired to the public endpoint
/// so issued URLs resolve for external callers.
pub struct S3Store {
    client: Client,
    presign_client: Client,
}

impl S3Store {
    pub fn new(config: &StorageConfig) -> Self {
        info!(endpoint = %config.endpoint, region = %config.region, "initializing S3 store");

        let presign_client = Client::from_conf(Self::client_config(config, &config.endpoint));
        let client = match &config.internal_endpoint {
            Some(internal) => Client::from_conf(Self::client_config(config, internal)),
            None => presign_client.clone(),
        };

        Self {
            client,
            presign_client,
        }
    }

    fn client_config(config: &StorageConfig, endpoint: &str) -> aws_sdk_s3::Config {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "object-gateway",
        );

        aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(endpoint)
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(config.path_style)
            .build()
    }

    fn presign_config(expires_in: Duration) -> Result<PresigningConfig, StoreError> {
        PresigningConfig::expires_in(expires_in)
            .context("invalid presigning expiry")
            .map_err(StoreError::Backend)
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn stat_object(&self, bucket: Bucket, key: &str) -> Result<ObjectStat, StoreError> {
        debug!(bucket = %bucket, key, "HeadObject");

        let head = self
            .client
            .head_object()
            .bucket(bucket.as_str())
            .key(key)
            .send()
            .await
            .map_err(|err| {
                if err.as_service_error().is_some_and(|e| e.is_not_found()) {
                    StoreError::NotFound
                } else {
                    StoreError::Backend(anyhow!(err).context("HeadObject request failed"))
                }
            })?;

        Ok(ObjectStat {
            size: head.content_length().unwrap_or_default().max(0) as u64,
            content_type: head.content_type().map(str::to_string),
            etag: head.e_tag().map(|tag| tag.trim_matches('"').to_string()),
            last_modified: head
                .last_modified()
                .and_then(|ts| ts.to_millis().ok())
                .and_then(DateTime::from_timestamp_millis),
        })
    }

    async fn put_object(
        &self,
        bucket: Bucket,
        key: &str,
        content: Bytes,
        content_type: &str,
    ) -> Result<(), StoreError> {
        let length = content.len();
        debug!(bucket = %bucket, key, length, "PutObject");

        self.client
            .put_object()
            .bucket(bucket.as_str())
            .key(key)
            .content_type(content_type)
            .content_length(length as i64)
            .body(ByteStream::from(content))
            .send()
            .await
            .map_err(|err| StoreError::Backend(anyhow!(err).context("PutObject request failed")))?;

        Ok(())
    }

    async fn get_object(&self, bucket: Bucket, key: &str) -> Result<Bytes, StoreError> {
        debug!(bucket = %bucket, key, "GetObject");

        let output = self
            .client
            .get_object()
            .bucket(bucket.as_str())
            .key(key)
            .send()
            .await
            .map_err(|err| {
                if err.as_service_error().is_some_and(|e| e.is_no_such_key()) {
                    StoreError::NotFound
                } else {
                    StoreError::Backend(anyhow!(err).context("GetObject request failed"))
                }
            })?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|err| StoreError::Backend(anyhow!(err).context("reading GetObject body")))?;

        Ok(body.into_bytes())
    }

    async fn remove_object(&self, bucket: Bucket, key: &str) -> Result<(), StoreError> {
        debug!(bucket = %bucket, key, "DeleteObject");

        self.client
            .delete_object()
            .bucket(bucket.as_str())
            .key(key)
            .send()
            .await
            .map_err(|err| {
                StoreError::Backend(anyhow!(err).context("DeleteObject request failed"))
            })?;

        Ok(())
    }

    async fn presigned_get(
        &self,
        bucket: Bucket,
        key: &str,
        expires_in: Duration,
        response_disposition: Option<&str>,
    ) -> Result<String, StoreError> {
        let mut request = self
            .presign_client
            .get_object()
            .bucket(bucket.as_str())
            .key(key);
        if let Some(disposition) = response_disposition {
            request = request.response_content_disposition(disposition);
        }

        let presigned = request
            .presigned(Self::presign_config(expires_in)?)
            .await
            .map_err(|err| StoreError::Backend(anyhow!(err).context("signing GET URL failed")))?;

        Ok(presigned.uri().to_string())
    }

    async fn presigned_put(
        &self,
        bucket: Bucket,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StoreError> {
        let presigned = self
            .presign_client
            .put_object()
            .bucket(bucket.as_str())
            .key(key)
            .presigned(Self::presign_config(expires_in)?)
            .await
            .map_err(|err| StoreError::Backend(anyhow!(err).context("signing PUT URL failed")))?;

        Ok(presigned.uri().to_string())
    }
}
