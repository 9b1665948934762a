use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::region::Region;
use tracing::debug;

use super::{Backend, FileInfo};
use crate::config::StorageConfig;

pub struct S3Backend {
    bucket: Box<Bucket>,
}

impl S3Backend {
    /// Connect with static credentials. A custom endpoint switches to
    /// path-style addressing; otherwise `region` must name an AWS region
    /// and virtual-host addressing is used.
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let credentials = Credentials::new(
            Some(config.access_key_id.as_str()),
            Some(config.secret_access_key.as_str()),
            None,
            None,
            None,
        )
        .context("invalid S3 credentials")?;

        let bucket = match config.endpoint.as_deref().filter(|e| !e.is_empty()) {
            Some(endpoint) => {
                let region = Region::Custom {
                    region: config.region.clone(),
                    endpoint: endpoint.to_string(),
                };
                Bucket::new(&config.bucket_name, region, credentials)?.with_path_style()
            }
            None => {
                let region: Region = config
                    .region
                    .parse()
                    .with_context(|| format!("invalid S3 region: {}", config.region))?;
                // Unknown names parse as Custom with the name as host.
                if matches!(region, Region::Custom { .. }) {
                    anyhow::bail!(
                        "unknown S3 region '{}' (set an endpoint for non-AWS stores)",
                        config.region
                    );
                }
                Bucket::new(&config.bucket_name, region, credentials)?
            }
        };
        Ok(Self { bucket })
    }
}

#[async_trait]
impl Backend for S3Backend {
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<()> {
        debug!(key, bytes = data.len(), content_type, "S3 PUT");
        self.bucket
            .put_object_with_content_type(key, data, content_type)
            .await
            .with_context(|| format!("S3 PUT failed: {key}"))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        debug!(key, "S3 GET");
        let response = self
            .bucket
            .get_object(key)
            .await
            .with_context(|| format!("S3 GET failed: {key}"))?;
        Ok(response.to_vec())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<FileInfo>> {
        debug!(prefix, "S3 LIST");
        let (page, _status) = self
            .bucket
            .list_page(prefix.to_string(), None, None, None, None)
            .await
            .with_context(|| format!("S3 LIST failed: {prefix}"))?;
        page.contents
            .into_iter()
            .map(|obj| {
                let last_modified = DateTime::parse_from_rfc3339(&obj.last_modified)
                    .with_context(|| {
                        format!("bad LastModified for {}: {}", obj.key, obj.last_modified)
                    })?
                    .with_timezone(&Utc);
                Ok(FileInfo {
                    key: obj.key,
                    size: obj.size,
                    last_modified,
                })
            })
            .collect()
    }

    async fn delete(&self, key: &str) -> Result<()> {
        debug!(key, "S3 DELETE");
        self.bucket
            .delete_object(key)
            .await
            .with_context(|| format!("S3 DELETE failed: {key}"))?;
        Ok(())
    }

    async fn head_bucket(&self) -> Result<()> {
        let name = self.bucket.name();
        debug!(bucket = %name, "S3 bucket check");
        // One-key listing: no object data, and supported by R2 and MinIO
        // as well as AWS.
        self.bucket
            .list_page(String::new(), None, None, None, Some(1))
            .await
            .with_context(|| format!("S3 bucket check failed: {name}"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: Option<&str>, region: &str) -> StorageConfig {
        StorageConfig {
            access_key_id: "key".into(),
            secret_access_key: "secret".into(),
            bucket_name: "scrapes".into(),
            region: region.into(),
            endpoint: endpoint.map(str::to_string),
        }
    }

    #[test]
    fn builds_for_custom_endpoint() {
        assert!(S3Backend::new(&config(Some("http://localhost:9000"), "auto")).is_ok());
    }

    #[test]
    fn builds_for_aws_region() {
        assert!(S3Backend::new(&config(None, "eu-central-1")).is_ok());
    }

    #[test]
    fn rejects_unknown_region_without_endpoint() {
        let err = S3Backend::new(&config(None, "eu-centrl-1")).err().unwrap();
        assert!(err.to_string().contains("eu-centrl-1"));

        // Default region "auto" only makes sense with a custom endpoint.
        assert!(S3Backend::new(&StorageConfig::default()).is_err());
    }

    #[test]
    fn empty_endpoint_counts_as_none() {
        assert!(S3Backend::new(&config(Some(""), "auto")).is_err());
        assert!(S3Backend::new(&config(Some(""), "us-east-1")).is_ok());
    }
}
