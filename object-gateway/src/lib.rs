//! Object storage gateway for the Translator Space backend.
//!
//! Mediates every interaction with the S3-compatible object store: derives
//! object paths from logical file identities, gates reads and deletes on
//! object existence, performs direct uploads/downloads, and issues
//! presigned upload/download/view URLs so clients can move bytes without
//! routing them through the backend.

pub mod bucket;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod storage;

pub use bucket::Bucket;
pub use config::StorageConfig;
pub use error::{GatewayError, Result};
pub use gateway::{DownloadedObject, ObjectGateway, PresignedUpload, DEFAULT_URL_EXPIRY_MINUTES};
pub use storage::{ObjectStat, ObjectStore, StoreError};
