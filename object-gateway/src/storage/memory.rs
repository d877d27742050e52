//! In-memory implementation of [`ObjectStore`] for tests and local
//! development.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::bucket::Bucket;

use super::{ObjectStat, ObjectStore, StoreError};

#[derive(Debug, Clone)]
struct StoredObject {
    content: Bytes,
    content_type: String,
    last_modified: DateTime<Utc>,
}

/// Process-local object map behind a [`RwLock`].
///
/// Presigned URLs are synthetic but carry the same query parameters a
/// real backend would sign (`X-Amz-Expires`, the disposition override),
/// so callers can assert on expiry and disposition without a live store.
#[derive(Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<(Bucket, String), StoredObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects currently held, across all buckets.
    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }

    fn signed_url(
        bucket: Bucket,
        key: &str,
        method: &str,
        expires_in: Duration,
        response_disposition: Option<&str>,
    ) -> String {
        let mut url = format!(
            "https://storage.local/{}/{}?X-Amz-SignedMethod={}&X-Amz-Expires={}",
            bucket.as_str(),
            key,
            method,
            expires_in.as_secs()
        );
        if let Some(disposition) = response_disposition {
            url.push_str("&response-content-disposition=");
            url.push_str(disposition);
        }
        url
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn stat_object(&self, bucket: Bucket, key: &str) -> Result<ObjectStat, StoreError> {
        let objects = self.objects.read().await;
        let object = objects
            .get(&(bucket, key.to_string()))
            .ok_or(StoreError::NotFound)?;

        Ok(ObjectStat {
            size: object.content.len() as u64,
            content_type: Some(object.content_type.clone()),
            etag: None,
            last_modified: Some(object.last_modified),
        })
    }

    async fn put_object(
        &self,
        bucket: Bucket,
        key: &str,
        content: Bytes,
        content_type: &str,
    ) -> Result<(), StoreError> {
        let mut objects = self.objects.write().await;
        objects.insert(
            (bucket, key.to_string()),
            StoredObject {
                content,
                content_type: content_type.to_string(),
                last_modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn get_object(&self, bucket: Bucket, key: &str) -> Result<Bytes, StoreError> {
        let objects = self.objects.read().await;
        let object = objects
            .get(&(bucket, key.to_string()))
            .ok_or(StoreError::NotFound)?;
        Ok(object.content.clone())
    }

    async fn remove_object(&self, bucket: Bucket, key: &str) -> Result<(), StoreError> {
        // Removing an absent key succeeds silently, matching S3 semantics.
        let mut objects = self.objects.write().await;
        objects.remove(&(bucket, key.to_string()));
        Ok(())
    }

    async fn presigned_get(
        &self,
        bucket: Bucket,
        key: &str,
        expires_in: Duration,
        response_disposition: Option<&str>,
    ) -> Result<String, StoreError> {
        Ok(Self::signed_url(
            bucket,
            key,
            "GET",
            expires_in,
            response_disposition,
        ))
    }

    async fn presigned_put(
        &self,
        bucket: Bucket,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StoreError> {
        Ok(Self::signed_url(bucket, key, "PUT", expires_in, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_stat_and_get() {
        let store = MemoryStore::new();
        store
            .put_object(
                Bucket::Export,
                "report.csv",
                Bytes::from_static(b"a,b,c"),
                "text/csv",
            )
            .await
            .unwrap();

        let stat = store.stat_object(Bucket::Export, "report.csv").await.unwrap();
        assert_eq!(stat.size, 5);
        assert_eq!(stat.content_type.as_deref(), Some("text/csv"));
        assert!(stat.last_modified.is_some());

        let content = store.get_object(Bucket::Export, "report.csv").await.unwrap();
        assert_eq!(content.as_ref(), b"a,b,c");
    }

    #[tokio::test]
    async fn test_stat_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.stat_object(Bucket::Export, "nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_buckets_are_isolated() {
        let store = MemoryStore::new();
        store
            .put_object(Bucket::Avatar, "me.png", Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();

        let err = store.stat_object(Bucket::Export, "me.png").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_remove_missing_succeeds_silently() {
        let store = MemoryStore::new();
        assert!(store.remove_object(Bucket::Export, "nope").await.is_ok());
    }

    #[tokio::test]
    async fn test_signed_urls_carry_expiry_and_disposition() {
        let store = MemoryStore::new();

        let url = store
            .presigned_get(
                Bucket::Translation,
                "user-1/a.pdf",
                Duration::from_secs(300),
                Some("attachment; filename=a.pdf"),
            )
            .await
            .unwrap();
        assert!(url.contains("X-Amz-Expires=300"));
        assert!(url.contains("response-content-disposition=attachment; filename=a.pdf"));

        let url = store
            .presigned_put(Bucket::Translation, "user-1/a.pdf", Duration::from_secs(300))
            .await
            .unwrap();
        assert!(url.contains("X-Amz-SignedMethod=PUT"));
        assert!(!url.contains("response-content-disposition"));
    }
}
