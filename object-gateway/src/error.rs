//! Error taxonomy for gateway operations.
//!
//! Every failure is one of two kinds: the requested object does not exist,
//! or talking to the backend failed for any other reason. Nothing is
//! suppressed or retried; both kinds carry enough context (bucket, path,
//! operation, cause) for the caller to log or translate.

use thiserror::Error;

use crate::bucket::Bucket;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The requested (bucket, path) pair does not exist on the backend.
    ///
    /// Raised by the existence gate ahead of every read, delete and
    /// presigned-read operation. Recoverable by the caller.
    #[error("object '{path}' does not exist in bucket '{bucket}'")]
    NotFound { bucket: Bucket, path: String },

    /// Any other failure communicating with the storage backend: network
    /// failure, permission denial, malformed request, unexpected response.
    #[error("{operation} failed for object '{path}' in bucket '{bucket}': {source}")]
    Backend {
        operation: &'static str,
        bucket: Bucket,
        path: String,
        #[source]
        source: anyhow::Error,
    },
}

impl GatewayError {
    /// Status code the web layer should translate this failure into.
    pub fn http_status_code(&self) -> u16 {
        match self {
            GatewayError::NotFound { .. } => 404,
            GatewayError::Backend { .. } => 502,
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_codes() {
        let not_found = GatewayError::NotFound {
            bucket: Bucket::Translation,
            path: "missing/x.txt".to_string(),
        };
        assert_eq!(not_found.http_status_code(), 404);

        let backend = GatewayError::Backend {
            operation: "download",
            bucket: Bucket::Export,
            path: "report.zip".to_string(),
            source: anyhow::anyhow!("connection reset"),
        };
        assert_eq!(backend.http_status_code(), 502);
    }

    #[test]
    fn test_messages_name_the_failing_object() {
        let not_found = GatewayError::NotFound {
            bucket: Bucket::Translation,
            path: "missing/x.txt".to_string(),
        };
        let message = not_found.to_string();
        assert!(message.contains("missing/x.txt"));
        assert!(message.contains("translation"));

        let backend = GatewayError::Backend {
            operation: "download",
            bucket: Bucket::Export,
            path: "report.zip".to_string(),
            source: anyhow::anyhow!("connection reset"),
        };
        let message = backend.to_string();
        assert!(message.contains("download"));
        assert!(message.contains("report.zip"));
        assert!(message.contains("connection reset"));
    }
}
