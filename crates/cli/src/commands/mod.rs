pub mod download;
pub mod init;
pub mod list;
pub mod ping;
pub mod rm;
pub mod scraped;
pub mod upload;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::debug;

use bucketscope_core::backend::local::LocalBackend;
use bucketscope_core::config::dev_user_from_env;
use bucketscope_core::{Category, Environment, StorageClient};

use crate::config::AppConfig;

#[derive(Subcommand)]
pub enum Command {
    /// Write a config file for the target bucket
    Init(init::InitArgs),
    /// Check that the bucket is reachable
    Ping(ping::PingArgs),
    /// Upload a CSV or image file
    Upload(upload::UploadArgs),
    /// Download a CSV or image object
    Download(download::DownloadArgs),
    /// List objects under a prefix
    List(list::ListArgs),
    /// Remove an object
    Rm(rm::RmArgs),
    /// Upload and fetch scraper exports
    Scraped(scraped::ScrapedArgs),
}

/// Which namespace and bucket a command talks to.
#[derive(Args)]
pub struct TargetArgs {
    /// Environment namespace: dev, stage or prod
    #[arg(long = "env", env = "APP_ENV", global = true)]
    pub environment: Option<Environment>,

    /// Developer namespace within dev (falls back to DEV_USER, then the config)
    #[arg(long, global = true)]
    pub dev_user: Option<String>,

    /// Use a local directory as the bucket instead of S3
    #[arg(long, env = "BUCKETSCOPE_LOCAL_DIR", global = true)]
    pub local_dir: Option<PathBuf>,
}

impl TargetArgs {
    pub fn open_client(&self) -> Result<StorageClient> {
        self.client_for(AppConfig::load_or_env()?, dev_user_from_env())
    }

    /// Flags win over `APP_ENV`/`DEV_USER`, which win over the saved config.
    fn resolve(
        &self,
        config: &AppConfig,
        env_dev_user: Option<String>,
    ) -> (Environment, Option<String>) {
        let environment = self
            .environment
            .or(config.environment)
            .unwrap_or(Environment::Development);
        let dev_user = self
            .dev_user
            .clone()
            .or(env_dev_user)
            .or_else(|| config.dev_user.clone());
        (environment, dev_user)
    }

    fn client_for(&self, config: AppConfig, env_dev_user: Option<String>) -> Result<StorageClient> {
        let (environment, dev_user) = self.resolve(&config, env_dev_user);
        match &self.local_dir {
            Some(dir) => {
                debug!(path = %dir.display(), "Using local directory backend");
                Ok(StorageClient::new(
                    Arc::new(LocalBackend::new(dir)),
                    environment,
                    dev_user.as_deref(),
                ))
            }
            None => StorageClient::connect(&config.storage, environment, dev_user.as_deref()),
        }
    }
}

/// Shared `--image` switch: commands act on csv unless it is set.
pub fn category(image: bool) -> Category {
    if image { Category::Images } else { Category::Csv }
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;
    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
