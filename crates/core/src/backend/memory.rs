use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{Backend, FileInfo};
use crate::error::StorageError;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: String,
    last_modified: DateTime<Utc>,
}

/// In-process bucket. Listings come back in key order, like S3.
#[derive(Debug)]
pub struct MemoryBackend {
    name: String,
    reachable: bool,
    objects: RwLock<BTreeMap<String, StoredObject>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new("memory")
    }
}

impl MemoryBackend {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            reachable: true,
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    /// A bucket that fails every bucket check, for exercising error paths.
    pub fn missing(name: &str) -> Self {
        Self {
            reachable: false,
            ..Self::new(name)
        }
    }

    /// Store an object with an explicit modification time.
    pub async fn put_at(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
        last_modified: DateTime<Utc>,
    ) {
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                data: data.to_vec(),
                content_type: content_type.to_string(),
                last_modified,
            },
        );
    }

    pub async fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .read()
            .await
            .get(key)
            .map(|o| o.content_type.clone())
    }

    pub async fn keys(&self) -> Vec<String> {
        self.objects.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<()> {
        self.put_at(key, data, content_type, Utc::now()).await;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.objects
            .read()
            .await
            .get(key)
            .map(|o| o.data.clone())
            .ok_or_else(|| {
                StorageError::ObjectNotFound {
                    key: key.to_string(),
                }
                .into()
            })
    }

    async fn list(&self, prefix: &str) -> Result<Vec<FileInfo>> {
        Ok(self
            .objects
            .read()
            .await
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, o)| FileInfo {
                key: key.clone(),
                size: o.data.len() as u64,
                last_modified: o.last_modified,
            })
            .collect())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.objects.write().await.remove(key);
        Ok(())
    }

    async fn head_bucket(&self) -> Result<()> {
        if self.reachable {
            Ok(())
        } else {
            Err(StorageError::BucketNotFound {
                bucket: self.name.clone(),
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn list_is_prefix_scoped_and_sorted() {
        let backend = MemoryBackend::default();
        for key in [
            "prod/csv/b.csv",
            "prod/csv/a.csv",
            "prod/images/a.png",
            "stage/csv/a.csv",
        ] {
            backend.put(key, b"1", "text/csv").await.unwrap();
        }

        let keys: Vec<_> = backend
            .list("prod/csv/")
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.key)
            .collect();
        assert_eq!(keys, vec!["prod/csv/a.csv", "prod/csv/b.csv"]);
        assert!(backend.list("dev/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn put_overwrites_silently() {
        let backend = MemoryBackend::default();
        backend.put("k", b"first", "text/csv").await.unwrap();
        backend.put("k", b"second", "image/png").await.unwrap();
        assert_eq!(backend.get("k").await.unwrap(), b"second");
        assert_eq!(backend.content_type("k").await.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn missing_bucket_fails_check() {
        let err = MemoryBackend::missing("gone").head_bucket().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StorageError>(),
            Some(StorageError::BucketNotFound { bucket }) if bucket == "gone"
        ));
    }
}
