use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::backend::s3::S3Backend;
use crate::backend::{Backend, FileInfo};
use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::key::{Category, Environment, KeyBuilder};

const CSV_CONTENT_TYPE: &str = "text/csv";
const SCRAPED_DIR: &str = "scraped";

/// Environment-scoped access to CSV and image objects in one bucket.
///
/// Cloning is cheap and every clone shares the same backend handle. The
/// client holds no mutable state, so it can be used from many tasks at once.
#[derive(Clone)]
pub struct StorageClient {
    backend: Arc<dyn Backend>,
    keys: KeyBuilder,
}

impl StorageClient {
    pub fn new(
        backend: Arc<dyn Backend>,
        environment: Environment,
        dev_user: Option<&str>,
    ) -> Self {
        Self {
            backend,
            keys: KeyBuilder::new(environment, dev_user),
        }
    }

    /// Connect to the S3-compatible bucket described by `config`.
    pub fn connect(
        config: &StorageConfig,
        environment: Environment,
        dev_user: Option<&str>,
    ) -> Result<Self> {
        let backend = S3Backend::new(config)?;
        info!(
            bucket = %config.bucket_name,
            environment = %environment,
            path_style = config.uses_custom_endpoint(),
            "Storage client connected"
        );
        Ok(Self::new(Arc::new(backend), environment, dev_user))
    }

    pub fn environment(&self) -> Environment {
        self.keys.environment()
    }

    pub fn keys(&self) -> &KeyBuilder {
        &self.keys
    }

    /// The bucket key `path` resolves to under `category`.
    pub fn key_for(&self, category: Category, path: &str) -> String {
        self.keys.build(category, path)
    }

    pub async fn upload_csv(&self, path: &str, data: &[u8]) -> Result<()> {
        let key = self.keys.build(Category::Csv, path);
        self.backend.put(&key, data, CSV_CONTENT_TYPE).await?;
        info!(key = %key, bytes = data.len(), "Uploaded CSV");
        Ok(())
    }

    pub async fn download_csv(&self, path: &str) -> Result<Vec<u8>> {
        self.download(Category::Csv, path).await
    }

    pub async fn upload_image(&self, path: &str, data: &[u8], content_type: &str) -> Result<()> {
        let key = self.keys.build(Category::Images, path);
        self.backend.put(&key, data, content_type).await?;
        info!(key = %key, bytes = data.len(), content_type, "Uploaded image");
        Ok(())
    }

    pub async fn download_image(&self, path: &str) -> Result<Vec<u8>> {
        self.download(Category::Images, path).await
    }

    pub async fn download(&self, category: Category, path: &str) -> Result<Vec<u8>> {
        let key = self.keys.build(category, path);
        let data = self.backend.get(&key).await?;
        debug!(key = %key, bytes = data.len(), "Downloaded");
        Ok(data)
    }

    /// List CSV objects under `prefix`. One backend call; results beyond the
    /// backend's first page are not fetched.
    pub async fn list_csv_files(&self, prefix: &str) -> Result<Vec<FileInfo>> {
        self.list_files(Category::Csv, prefix).await
    }

    pub async fn list_image_files(&self, prefix: &str) -> Result<Vec<FileInfo>> {
        self.list_files(Category::Images, prefix).await
    }

    pub async fn list_files(&self, category: Category, prefix: &str) -> Result<Vec<FileInfo>> {
        let key = self.keys.build_prefix(category, prefix);
        let files = self.backend.list(&key).await?;
        debug!(prefix = %key, count = files.len(), "Listed");
        Ok(files)
    }

    pub async fn remove_file(&self, category: Category, path: &str) -> Result<()> {
        let key = self.keys.build(category, path);
        self.backend.delete(&key).await?;
        info!(key = %key, "Removed");
        Ok(())
    }

    pub async fn remove_csv(&self, path: &str) -> Result<()> {
        self.remove_file(Category::Csv, path).await
    }

    /// Store a scraper export as `csv/scraped/<store>/<filename>`.
    pub async fn upload_scraped_data(
        &self,
        store: &str,
        filename: &str,
        data: &[u8],
    ) -> Result<()> {
        self.upload_csv(&scraped_path(store, filename), data).await
    }

    /// The bucket key an export for `store` named `filename` is stored under.
    pub fn scraped_key(&self, store: &str, filename: &str) -> String {
        self.keys.build(Category::Csv, &scraped_path(store, filename))
    }

    /// Download the most recently modified export for `store`.
    ///
    /// Equal timestamps are resolved by the greater key, so the choice does
    /// not depend on listing order.
    pub async fn get_latest_scraped_file(&self, store: &str) -> Result<Vec<u8>> {
        let prefix = scraped_path(store, "");
        let files = self.list_csv_files(&prefix).await?;
        let latest = latest_file(&files).ok_or_else(|| StorageError::NoFilesFound {
            prefix: self.keys.build_prefix(Category::Csv, &prefix),
        })?;
        debug!(key = %latest.key, last_modified = %latest.last_modified, "Latest scraped file");
        // Listings return full keys, so fetch directly rather than re-prefixing.
        self.backend.get(&latest.key).await
    }

    /// Check that the bucket is reachable with the configured credentials.
    pub async fn test_connection(&self) -> Result<()> {
        self.backend.head_bucket().await
    }
}

fn scraped_path(store: &str, filename: &str) -> String {
    format!("{SCRAPED_DIR}/{store}/{filename}")
}

/// Newest entry by `last_modified`, ties going to the greater key.
pub fn latest_file(files: &[FileInfo]) -> Option<&FileInfo> {
    files
        .iter()
        .max_by(|a, b| {
            a.last_modified
                .cmp(&b.last_modified)
                .then_with(|| a.key.cmp(&b.key))
        })
}
