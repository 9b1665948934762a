pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod key;

pub use backend::FileInfo;
pub use client::StorageClient;
pub use config::StorageConfig;
pub use error::StorageError;
pub use key::{Category, Environment, KeyBuilder};
