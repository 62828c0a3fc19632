//! Storage types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about a stored object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub key: String,
    pub size: i64,
    pub last_modified: Option<DateTime<Utc>>,
    pub content_type: Option<String>,
    pub etag: Option<String>,
}

/// A fetched object with its full body
#[derive(Debug)]
pub struct StorageObject {
    pub metadata: ObjectMetadata,
    pub data: Vec<u8>,
}

/// One page of a bucket listing
#[derive(Debug, Clone, Serialize)]
pub struct ObjectList {
    pub objects: Vec<ObjectMetadata>,
    pub continuation_token: Option<String>,
    pub is_truncated: bool,
}

/// Options for a single listing page
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub prefix: Option<String>,
    pub max_keys: Option<i32>,
    pub continuation_token: Option<String>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_max_keys(mut self, max_keys: i32) -> Self {
        self.max_keys = Some(max_keys);
        self
    }

    pub fn with_continuation_token(mut self, token: impl Into<String>) -> Self {
        self.continuation_token = Some(token.into());
        self
    }
}

/// Content-type hints recognized by uploads.
///
/// `Csv` also sets an attachment disposition, which controls how the file
/// downloads when its URL is clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Csv,
    Pdf,
}

impl ContentKind {
    /// Maps a free-form hint (`"csv"`, `"pdf"`, any case) to a kind.
    /// Anything else, including the empty string, maps to `None`.
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint.to_ascii_lowercase().as_str() {
            "csv" => Some(ContentKind::Csv),
            "pdf" => Some(ContentKind::Pdf),
            _ => None,
        }
    }
}

/// Options for uploads
#[derive(Debug, Clone, Default)]
pub struct PutOptions {
    /// Object key; defaults to the final segment of the local path.
    pub key: Option<String>,
    pub content_kind: Option<ContentKind>,
}

impl PutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_content_kind(mut self, kind: ContentKind) -> Self {
        self.content_kind = Some(kind);
        self
    }
}
