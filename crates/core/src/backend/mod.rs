pub mod local;
pub mod memory;
pub mod s3;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// The object-store calls the client needs. Keys are full bucket keys; the
/// backend applies no namespacing of its own.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<()>;
    async fn get(&self, key: &str) -> Result<Vec<u8>>;
    /// A single listing call for `prefix`, in backend order.
    async fn list(&self, prefix: &str) -> Result<Vec<FileInfo>>;
    async fn delete(&self, key: &str) -> Result<()>;
    /// Metadata-only check that the bucket is reachable with the configured
    /// credentials.
    async fn head_bucket(&self) -> Result<()>;
}
