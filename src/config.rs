//! Configuration for the storage client

use serde::Deserialize;
use std::env;

/// Connection settings for one bucket.
///
/// Resolve this once at the application boundary, either from the
/// environment with [`StorageConfig::from_env`] or by filling the fields
/// directly when wiring dependencies by hand.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    /// AWS region; the client falls back to `us-east-1` when unset.
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible services (MinIO, R2, B2).
    pub endpoint: Option<String>,
    /// Upload objects with the `public-read` canned ACL.
    #[serde(default)]
    pub public_read: bool,
}

impl StorageConfig {
    /// Builds a config from `KOYO_S3_*` environment variables.
    ///
    /// `KOYO_S3_BUCKET`, `KOYO_S3_KEY` and `KOYO_S3_SECRET` are required;
    /// `KOYO_S3_REGION` and `KOYO_S3_ENDPOINT` are optional.
    /// `KOYO_S3_PUBLIC` enables public-read uploads when set to `"true"`
    /// (case-insensitive).
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(StorageConfig {
            bucket: env::var("KOYO_S3_BUCKET")?,
            access_key: env::var("KOYO_S3_KEY")?,
            secret_key: env::var("KOYO_S3_SECRET")?,
            region: env::var("KOYO_S3_REGION").ok(),
            endpoint: env::var("KOYO_S3_ENDPOINT").ok(),
            public_read: env::var("KOYO_S3_PUBLIC")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the KOYO_S3_* variables are never touched concurrently.
    #[test]
    fn from_env_reads_all_variables() {
        env::set_var("KOYO_S3_BUCKET", "r48koyo");
        env::set_var("KOYO_S3_KEY", "xyz");
        env::set_var("KOYO_S3_SECRET", "abc");
        env::set_var("KOYO_S3_REGION", "eu-west-2");
        env::set_var("KOYO_S3_ENDPOINT", "http://localhost:9000");
        env::set_var("KOYO_S3_PUBLIC", "TRUE");

        let config = StorageConfig::from_env().unwrap();
        assert_eq!(config.bucket, "r48koyo");
        assert_eq!(config.access_key, "xyz");
        assert_eq!(config.secret_key, "abc");
        assert_eq!(config.region.as_deref(), Some("eu-west-2"));
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:9000"));
        assert!(config.public_read);

        env::set_var("KOYO_S3_PUBLIC", "no");
        assert!(!StorageConfig::from_env().unwrap().public_read);

        env::remove_var("KOYO_S3_PUBLIC");
        env::remove_var("KOYO_S3_REGION");
        env::remove_var("KOYO_S3_ENDPOINT");
        let config = StorageConfig::from_env().unwrap();
        assert!(!config.public_read);
        assert!(config.region.is_none());
        assert!(config.endpoint.is_none());

        env::remove_var("KOYO_S3_BUCKET");
        assert!(StorageConfig::from_env().is_err());

        env::remove_var("KOYO_S3_KEY");
        env::remove_var("KOYO_S3_SECRET");
    }
}
