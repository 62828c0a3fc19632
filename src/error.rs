//! Error types for the storage client

use thiserror::Error;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Failures surfaced by the storage client.
///
/// Only the missing-object case is translated into its own variant; every
/// other service failure is carried through in [`StorageError::Sdk`] with
/// context. No retries happen at this layer.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Failed to read local file: {0}")]
    LocalFile(String),

    #[error("Invalid presigning configuration: {0}")]
    Presign(String),

    #[error("S3 SDK error: {0}")]
    Sdk(String),
}
