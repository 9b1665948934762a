use anyhow::Result;
use clap::Args;
use tracing::info;

use bucketscope_core::{Environment, StorageConfig};

use crate::config::AppConfig;

#[derive(Args)]
pub struct InitArgs {
    /// Start from the S3_* / R2_* environment variables
    #[arg(long)]
    from_env: bool,

    /// Bucket name
    #[arg(long)]
    bucket: Option<String>,

    /// Region (use "auto" for R2)
    #[arg(long)]
    region: Option<String>,

    /// Custom endpoint URL for R2, MinIO and other S3-compatible stores
    #[arg(long)]
    endpoint: Option<String>,

    /// Access key ID
    #[arg(long)]
    access_key: Option<String>,

    /// Secret access key
    #[arg(long)]
    secret_key: Option<String>,

    /// Default environment namespace
    #[arg(long = "default-env")]
    default_env: Option<Environment>,

    /// Default developer namespace
    #[arg(long = "default-dev-user")]
    default_dev_user: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: InitArgs) -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() && !args.force {
        anyhow::bail!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    let config = build_config(args);
    config.save_to(&path)?;

    info!(config_path = %path.display(), bucket = %config.storage.bucket_name, "Config saved");
    println!("Config written to {}", path.display());
    Ok(())
}

fn build_config(args: InitArgs) -> AppConfig {
    let mut storage = if args.from_env {
        StorageConfig::from_env()
    } else {
        StorageConfig::default()
    };
    if let Some(bucket) = args.bucket {
        storage.bucket_name = bucket;
    }
    if let Some(region) = args.region {
        storage.region = region;
    }
    if let Some(endpoint) = args.endpoint {
        storage.endpoint = Some(endpoint).filter(|e| !e.is_empty());
    }
    if let Some(access_key) = args.access_key {
        storage.access_key_id = access_key;
    }
    if let Some(secret_key) = args.secret_key {
        storage.secret_access_key = secret_key;
    }
    AppConfig {
        environment: args.default_env,
        dev_user: args.default_dev_user.filter(|u| !u.is_empty()),
        storage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> InitArgs {
        InitArgs {
            from_env: false,
            bucket: None,
            region: None,
            endpoint: None,
            access_key: None,
            secret_key: None,
            default_env: None,
            default_dev_user: None,
            force: false,
        }
    }

    #[test]
    fn flags_override_defaults() {
        let config = build_config(InitArgs {
            bucket: Some("scrapes".into()),
            endpoint: Some("https://acct.r2.cloudflarestorage.com".into()),
            default_env: Some(Environment::Staging),
            default_dev_user: Some(String::new()),
            ..args()
        });
        assert_eq!(config.storage.bucket_name, "scrapes");
        assert_eq!(config.storage.region, "auto");
        assert!(config.storage.uses_custom_endpoint());
        assert_eq!(config.environment, Some(Environment::Staging));
        assert_eq!(config.dev_user, None);
    }

    #[test]
    fn empty_endpoint_means_public_cloud() {
        let config = build_config(InitArgs {
            endpoint: Some(String::new()),
            ..args()
        });
        assert_eq!(config.storage.endpoint, None);
    }
}
