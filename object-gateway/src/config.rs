//! Storage configuration.
//!
//! Owned by the embedding application's settings layer; the gateway only
//! consumes the finished struct. Defaults target a local MinIO instance.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Connection settings for the S3-compatible backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Public endpoint. Presigned URLs are always generated against this
    /// address so external callers can resolve them.
    pub endpoint: String,
    /// Optional endpoint for data-plane traffic, for deployments where
    /// the public endpoint is only reachable through an edge proxy.
    pub internal_endpoint: Option<String>,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    /// Reject plain-http endpoints when set.
    pub require_tls: bool,
    /// Path-style addressing, required by MinIO.
    pub path_style: bool,
}

impl StorageConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            endpoint: env::var("S3_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:9000".to_string()),
            internal_endpoint: env::var("S3_INTERNAL_ENDPOINT").ok(),
            region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            access_key: env::var("S3_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".to_string()),
            secret_key: env::var("S3_SECRET_KEY").unwrap_or_else(|_| "minioadmin".to_string()),
            require_tls: env::var("S3_REQUIRE_TLS")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            path_style: env::var("S3_PATH_STYLE")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
        })
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            anyhow::bail!("S3 endpoint cannot be empty");
        }
        if self.access_key.is_empty() || self.secret_key.is_empty() {
            anyhow::bail!("S3 credentials cannot be empty");
        }
        if self.require_tls && self.endpoint.starts_with("http://") {
            anyhow::bail!("TLS is required but the S3 endpoint is plain http");
        }
        if self.require_tls {
            if let Some(internal) = &self.internal_endpoint {
                if internal.starts_with("http://") {
                    anyhow::bail!("TLS is required but the internal S3 endpoint is plain http");
                }
            }
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9000".to_string(), // MinIO default
            internal_endpoint: None,
            region: "us-east-1".to_string(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            require_tls: false,
            path_style: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = StorageConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.region, "us-east-1");
        assert!(config.path_style);
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        let mut config = StorageConfig::default();
        config.endpoint = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_credentials_rejected() {
        let mut config = StorageConfig::default();
        config.access_key = String::new();
        assert!(config.validate().is_err());

        config.access_key = "minioadmin".to_string();
        config.secret_key = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tls_requirement_checks_scheme() {
        let mut config = StorageConfig::default();
        config.require_tls = true;
        assert!(config.validate().is_err());

        config.endpoint = "https://storage.example.com".to_string();
        assert!(config.validate().is_ok());

        config.internal_endpoint = Some("http://storage.internal:9000".to_string());
        assert!(config.validate().is_err());

        config.internal_endpoint = Some("https://storage.internal:9000".to_string());
        assert!(config.validate().is_ok());
    }
}
