use thiserror::Error;

/// Failures raised by this crate itself. Backend transport errors are not
/// wrapped here; they travel through `anyhow` untouched.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no files found under {prefix}")]
    NoFilesFound { prefix: String },

    #[error("object not found: {key}")]
    ObjectNotFound { key: String },

    #[error("bucket not found: {bucket}")]
    BucketNotFound { bucket: String },

    #[error("unknown environment: {0} (expected dev, stage or prod)")]
    InvalidEnvironment(String),
}
