//! Single-bucket S3 convenience client.
//!
//! Wraps the AWS SDK with upload, download, delete, listing, and
//! pre-signed-URL operations against one configured bucket. Configuration is
//! resolved once at the boundary, from `KOYO_S3_*` environment variables or
//! an explicit [`StorageConfig`]; each client carries its own credentials,
//! so separate instances never interfere.
//!
//! ```no_run
//! use koyo_s3::{ContentKind, PutOptions, S3Client, StorageConfig};
//!
//! # async fn demo() -> Result<(), koyo_s3::StorageError> {
//! let config = StorageConfig::from_env().expect("KOYO_S3_* not set");
//! let client = S3Client::new(&config).await?;
//!
//! let key = client
//!     .put_file(
//!         "./reports/monthly.csv",
//!         PutOptions::new().with_content_kind(ContentKind::Csv),
//!     )
//!     .await?;
//! let url = client.presigned_get_url(&key, None).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod s3_client;
mod types;

pub use config::StorageConfig;
pub use error::{Result, StorageError};
pub use s3_client::{key_from_path, S3Client, DEFAULT_PRESIGN_EXPIRY};
pub use types::{
    ContentKind, ListOptions, ObjectList, ObjectMetadata, PutOptions, StorageObject,
};
