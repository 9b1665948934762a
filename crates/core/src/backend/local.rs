use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use super::{Backend, FileInfo};
use crate::error::StorageError;

/// A directory standing in for a bucket. Keys map to relative file paths;
/// content types are not kept.
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            root: path.as_ref().to_path_buf(),
        }
    }

    pub fn init(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("failed to create directory: {}", root.display()))?;
        Ok(Self { root })
    }

    fn full_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn key_of(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?;
        Some(parts.join("/"))
    }
}

#[async_trait]
impl Backend for LocalBackend {
    async fn put(&self, key: &str, data: &[u8], _content_type: &str) -> Result<()> {
        let full = self.full_path(key);
        debug!(path = %full.display(), bytes = data.len(), "local write");
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, data)
            .await
            .with_context(|| format!("failed to write: {}", full.display()))
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let full = self.full_path(key);
        if !full.is_file() {
            return Err(StorageError::ObjectNotFound {
                key: key.to_string(),
            }
            .into());
        }
        tokio::fs::read(&full)
            .await
            .with_context(|| format!("failed to read: {}", full.display()))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<FileInfo>> {
        let mut files = Vec::new();
        let mut pending = vec![self.root.clone()];
        while let Some(dir) = pending.pop() {
            if !dir.is_dir() {
                continue;
            }
            let mut read_dir = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = read_dir.next_entry().await? {
                let path = entry.path();
                let metadata = entry.metadata().await?;
                if metadata.is_dir() {
                    pending.push(path);
                    continue;
                }
                let Some(key) = self.key_of(&path) else {
                    continue;
                };
                if !key.starts_with(prefix) {
                    continue;
                }
                let last_modified: DateTime<Utc> = metadata
                    .modified()
                    .with_context(|| format!("no mtime for {}", path.display()))?
                    .into();
                files.push(FileInfo {
                    key,
                    size: metadata.len(),
                    last_modified,
                });
            }
        }
        files.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(files)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let full = self.full_path(key);
        if full.is_file() {
            tokio::fs::remove_file(&full).await?;
        }
        Ok(())
    }

    async fn head_bucket(&self) -> Result<()> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(StorageError::BucketNotFound {
                bucket: self.root.display().to_string(),
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_backend_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::init(dir.path()).unwrap();

        backend
            .put("prod/csv/prices.csv", b"a,b\n1,2\n", "text/csv")
            .await
            .unwrap();
        let data = backend.get("prod/csv/prices.csv").await.unwrap();
        assert_eq!(data, b"a,b\n1,2\n");

        let list = backend.list("prod/csv/").await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].key, "prod/csv/prices.csv");
        assert_eq!(list[0].size, 8);

        backend.delete("prod/csv/prices.csv").await.unwrap();
        let err = backend.get("prod/csv/prices.csv").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StorageError>(),
            Some(StorageError::ObjectNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn list_matches_key_prefix_across_directories() {
        let dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::init(dir.path()).unwrap();
        for key in [
            "stage/csv/scraped/acme/1.csv",
            "stage/csv/scraped/acme/2.csv",
            "stage/csv/scraped/acme-outlet/1.csv",
            "stage/images/logo.png",
        ] {
            backend.put(key, b"x", "text/csv").await.unwrap();
        }

        let keys: Vec<_> = backend
            .list("stage/csv/scraped/acme")
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.key)
            .collect();
        assert_eq!(
            keys,
            vec![
                "stage/csv/scraped/acme-outlet/1.csv",
                "stage/csv/scraped/acme/1.csv",
                "stage/csv/scraped/acme/2.csv",
            ]
        );

        assert!(backend.list("prod/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn head_bucket_requires_root() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LocalBackend::new(dir.path()).head_bucket().await.is_ok());

        let missing = LocalBackend::new(dir.path().join("nope"));
        let err = missing.head_bucket().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StorageError>(),
            Some(StorageError::BucketNotFound { .. })
        ));
    }
}
