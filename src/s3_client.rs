//! S3 storage client
//!
//! Wraps the AWS SDK for single-bucket object access. Every operation is a
//! direct pass-through to the service; this layer adds no retries and no
//! caching.

use std::path::Path;
use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::{Credentials, Region},
    presigning::PresigningConfig,
    primitives::ByteStream,
    types::ObjectCannedAcl,
    Client,
};
use chrono::DateTime;

use crate::config::StorageConfig;
use crate::error::{Result, StorageError};
use crate::types::{
    ContentKind, ListOptions, ObjectList, ObjectMetadata, PutOptions, StorageObject,
};

/// Default expiry for pre-signed GET URLs.
pub const DEFAULT_PRESIGN_EXPIRY: Duration = Duration::from_secs(900);

/// Derives an object key from a local path: its final segment.
pub fn key_from_path(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// S3 client bound to one bucket.
///
/// Holds its own credentials and region; separate instances never share
/// configuration. Cheap to clone and safe to share across tasks.
#[derive(Clone)]
pub struct S3Client {
    client: Client,
    bucket: String,
    public_read: bool,
}

/// Headers for one upload, computed from call-local inputs.
struct UploadHeaders {
    content_type: Option<&'static str>,
    content_disposition: Option<String>,
    acl: Option<ObjectCannedAcl>,
}

fn upload_headers(kind: Option<ContentKind>, key: &str, public_read: bool) -> UploadHeaders {
    let (content_type, content_disposition) = match kind {
        Some(ContentKind::Csv) => (
            Some("text/csv"),
            Some(format!("attachment; filename={}", key)),
        ),
        Some(ContentKind::Pdf) => (Some("application/pdf"), None),
        None => (None, None),
    };

    UploadHeaders {
        content_type,
        content_disposition,
        acl: public_read.then_some(ObjectCannedAcl::PublicRead),
    }
}

impl S3Client {
    /// Create a new client from configuration.
    ///
    /// Issues a `HeadBucket` to verify the bucket is reachable; a failure is
    /// logged but does not fail construction.
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "koyo-s3",
        );

        let region = config
            .region
            .clone()
            .unwrap_or_else(|| "us-east-1".to_string());

        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region))
            .credentials_provider(credentials);

        if let Some(endpoint) = &config.endpoint {
            // Path-style addressing is required for MinIO and other
            // S3-compatible services.
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        let client = Client::from_conf(builder.build());

        let bucket = config.bucket.clone();
        match client.head_bucket().bucket(&bucket).send().await {
            Ok(_) => {
                tracing::info!("Connected to S3 bucket: {}", bucket);
            }
            Err(e) => {
                tracing::warn!(
                    "Could not verify bucket {}: {}. Will attempt operations anyway.",
                    bucket,
                    e
                );
            }
        }

        Ok(Self {
            client,
            bucket,
            public_read: config.public_read,
        })
    }

    /// Get the bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// List one page of objects in the bucket.
    ///
    /// Returns at most one `ListObjectsV2` page; check `is_truncated` and
    /// feed `continuation_token` back in to continue, or use
    /// [`S3Client::list_all_objects`] to paginate automatically.
    pub async fn list_objects(&self, options: ListOptions) -> Result<ObjectList> {
        let mut request = self.client.list_objects_v2().bucket(&self.bucket);

        if let Some(prefix) = options.prefix {
            request = request.prefix(prefix);
        }

        if let Some(max_keys) = options.max_keys {
            request = request.max_keys(max_keys);
        }

        if let Some(token) = options.continuation_token {
            request = request.continuation_token(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StorageError::Sdk(format!("Failed to list objects: {}", e)))?;

        let objects: Vec<ObjectMetadata> = response
            .contents()
            .iter()
            .map(|obj| ObjectMetadata {
                key: obj.key().unwrap_or_default().to_string(),
                size: obj.size().unwrap_or(0),
                last_modified: obj.last_modified().and_then(|dt| {
                    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
                }),
                content_type: None, // Not available in list response
                etag: obj.e_tag().map(|s| s.to_string()),
            })
            .collect();

        Ok(ObjectList {
            objects,
            continuation_token: response.next_continuation_token().map(|s| s.to_string()),
            is_truncated: response.is_truncated().unwrap_or(false),
        })
    }

    /// List all objects with a given prefix, following continuation tokens
    /// until the listing is exhausted.
    pub async fn list_all_objects(&self, prefix: Option<&str>) -> Result<Vec<ObjectMetadata>> {
        let mut all_objects = Vec::new();
        let mut continuation_token = None;

        loop {
            let mut options = ListOptions::new().with_max_keys(1000);

            if let Some(p) = prefix {
                options = options.with_prefix(p);
            }

            if let Some(token) = continuation_token.take() {
                options = options.with_continuation_token(token);
            }

            let result = self.list_objects(options).await?;
            all_objects.extend(result.objects);

            if !result.is_truncated {
                break;
            }

            continuation_token = result.continuation_token;
        }

        Ok(all_objects)
    }

    /// Upload a local file and return the key it was stored under.
    ///
    /// The key defaults to the final segment of `path`. A content kind of
    /// `Csv` uploads with `text/csv` and an attachment disposition; `Pdf`
    /// with `application/pdf`; no kind leaves both headers unset. Clients
    /// configured for public reads add the `public-read` canned ACL.
    pub async fn put_file(&self, path: impl AsRef<Path>, options: PutOptions) -> Result<String> {
        let path = path.as_ref();
        let PutOptions { key, content_kind } = options;
        let key = key.unwrap_or_else(|| key_from_path(path));
        let headers = upload_headers(content_kind, &key, self.public_read);

        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::LocalFile(format!("{}: {}", path.display(), e)))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .set_content_type(headers.content_type.map(str::to_string))
            .set_content_disposition(headers.content_disposition)
            .set_acl(headers.acl)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                StorageError::Sdk(format!(
                    "Failed to upload {} as {}: {}",
                    path.display(),
                    key,
                    e
                ))
            })?;

        tracing::debug!("Uploaded {} as {}", path.display(), key);
        Ok(key)
    }

    /// Fetch an object's full body into memory.
    ///
    /// No streaming and no range requests; the whole object is buffered.
    pub async fn get_object(&self, key: &str) -> Result<StorageObject> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|err| err.is_no_such_key()) {
                    StorageError::ObjectNotFound(key.to_string())
                } else {
                    StorageError::Sdk(format!("Failed to get object {}: {}", key, e))
                }
            })?;

        let metadata = ObjectMetadata {
            key: key.to_string(),
            size: response.content_length().unwrap_or(0),
            last_modified: response.last_modified().and_then(|dt| {
                DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
            }),
            content_type: response.content_type().map(|s| s.to_string()),
            etag: response.e_tag().map(|s| s.to_string()),
        };

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Sdk(format!("Failed to read object body: {}", e)))?
            .into_bytes()
            .to_vec();

        Ok(StorageObject { metadata, data })
    }

    /// Get object metadata (HEAD request)
    pub async fn head_object(&self, key: &str) -> Result<ObjectMetadata> {
        let response = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|err| err.is_not_found()) {
                    StorageError::ObjectNotFound(key.to_string())
                } else {
                    StorageError::Sdk(format!("Failed to head object {}: {}", key, e))
                }
            })?;

        Ok(ObjectMetadata {
            key: key.to_string(),
            size: response.content_length().unwrap_or(0),
            last_modified: response.last_modified().and_then(|dt| {
                DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
            }),
            content_type: response.content_type().map(|s| s.to_string()),
            etag: response.e_tag().map(|s| s.to_string()),
        })
    }

    /// Check if an object exists
    pub async fn object_exists(&self, key: &str) -> Result<bool> {
        match self.head_object(key).await {
            Ok(_) => Ok(true),
            Err(StorageError::ObjectNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Delete an object.
    ///
    /// S3 delete is idempotent: deleting a key that does not exist succeeds.
    pub async fn delete_object(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Sdk(format!("Failed to delete object {}: {}", key, e)))?;

        tracing::debug!("Deleted object {}", key);
        Ok(())
    }

    /// Generate a pre-signed GET URL for a private object.
    ///
    /// `None` uses [`DEFAULT_PRESIGN_EXPIRY`] (900 seconds).
    pub async fn presigned_get_url(
        &self,
        key: &str,
        expires_in: Option<Duration>,
    ) -> Result<String> {
        let expires_in = expires_in.unwrap_or(DEFAULT_PRESIGN_EXPIRY);
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::Presign(e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::Sdk(format!("Failed to presign GET for {}: {}", key, e)))?;

        Ok(request.uri().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Presigning and local-file handling need no network, so these run
    // against a client that never sends a request. Round-trips against a
    // live bucket belong in integration tests with MinIO.
    fn test_client(public_read: bool) -> S3Client {
        let credentials = Credentials::new("test-key", "test-secret", None, None, "test");
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(credentials)
            .build();

        S3Client {
            client: Client::from_conf(config),
            bucket: "koyo-test".to_string(),
            public_read,
        }
    }

    #[test]
    fn test_key_from_path() {
        assert_eq!(key_from_path("/a/b/c.csv"), "c.csv");
        assert_eq!(key_from_path("c.csv"), "c.csv");
        assert_eq!(key_from_path("reports/2024/summary.pdf"), "summary.pdf");
    }

    #[test]
    fn test_upload_headers_csv() {
        let headers = upload_headers(Some(ContentKind::Csv), "c.csv", false);
        assert_eq!(headers.content_type, Some("text/csv"));
        assert_eq!(
            headers.content_disposition.as_deref(),
            Some("attachment; filename=c.csv")
        );
        assert!(headers.acl.is_none());
    }

    #[test]
    fn test_upload_headers_pdf() {
        let headers = upload_headers(Some(ContentKind::Pdf), "c.pdf", false);
        assert_eq!(headers.content_type, Some("application/pdf"));
        assert!(headers.content_disposition.is_none());
    }

    #[test]
    fn test_upload_headers_no_kind() {
        let headers = upload_headers(None, "c.bin", false);
        assert!(headers.content_type.is_none());
        assert!(headers.content_disposition.is_none());
        assert!(headers.acl.is_none());
    }

    #[test]
    fn test_upload_headers_public_read() {
        let headers = upload_headers(None, "c.bin", true);
        assert_eq!(headers.acl, Some(ObjectCannedAcl::PublicRead));
    }

    #[tokio::test]
    async fn test_presigned_url_default_expiry() {
        let client = test_client(false);
        let url = client.presigned_get_url("report.csv", None).await.unwrap();

        assert!(url.contains("koyo-test"));
        assert!(url.contains("report.csv"));
        assert!(url.contains("X-Amz-Expires=900"));
    }

    #[tokio::test]
    async fn test_presigned_url_custom_expiry() {
        let client = test_client(false);
        let url = client
            .presigned_get_url("report.csv", Some(Duration::from_secs(60)))
            .await
            .unwrap();

        assert!(url.contains("X-Amz-Expires=60"));
    }

    #[tokio::test]
    async fn test_put_file_missing_local_file() {
        let client = test_client(false);
        let err = client
            .put_file("/no/such/dir/report.csv", PutOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::LocalFile(_)));
    }
}
